use std::sync::{Arc, Mutex};
use taskman_core::{Activity, ActivityStore, StoreError, Tag};

fn recording_listener(store: &mut ActivityStore) -> Arc<Mutex<Vec<usize>>> {
    let sizes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&sizes);
    store.subscribe(Box::new(move |activities: &[Activity]| {
        sink.lock().unwrap().push(activities.len());
    }));
    sizes
}

#[test]
fn duplicate_titles_are_rejected_and_size_is_unchanged() {
    let mut store = ActivityStore::new();
    store.add(Activity::task("Ali").unwrap()).unwrap();

    let clash = Activity::task("Ali").unwrap().with_deadline(100);
    assert_eq!(
        store.add(clash).unwrap_err(),
        StoreError::DuplicateActivity("Ali".to_string())
    );
    assert_eq!(store.len(), 1);
}

#[test]
fn removing_an_absent_record_fails_without_notifying() {
    let mut store = ActivityStore::new();
    store.add(Activity::task("kept").unwrap()).unwrap();
    let sizes = recording_listener(&mut store);

    let err = store.remove(&Activity::task("ghost").unwrap()).unwrap_err();
    assert!(matches!(err, StoreError::ActivityNotFound(_)));
    assert_eq!(store.len(), 1);
    assert_eq!(*sizes.lock().unwrap(), vec![1]);
}

#[test]
fn listeners_are_primed_then_notified_after_each_mutation() {
    let mut store = ActivityStore::new();
    let sizes = recording_listener(&mut store);

    let report = Activity::task("report").unwrap();
    store.add(report.clone()).unwrap();
    store.add(Activity::task("milk").unwrap()).unwrap();
    store.remove(&report).unwrap();
    store.reset_data(Vec::new());

    assert_eq!(*sizes.lock().unwrap(), vec![0, 1, 2, 1, 0]);
}

#[test]
fn replace_checks_uniqueness_without_the_target_and_notifies_once() {
    let mut store = ActivityStore::new();
    let report = Activity::task("report").unwrap();
    store.add(report.clone()).unwrap();
    store.add(Activity::task("milk").unwrap()).unwrap();
    let sizes = recording_listener(&mut store);

    let retagged = report.clone().with_tags([Tag::parse("work").unwrap()]);
    store.replace(&report, retagged.clone()).unwrap();
    assert!(store.contains(&retagged));
    assert!(!store.contains(&report));
    assert_eq!(*sizes.lock().unwrap(), vec![2, 2]);

    let renamed_clash = Activity::task("milk").unwrap().with_deadline(5);
    let err = store.replace(&retagged, renamed_clash).unwrap_err();
    assert_eq!(err, StoreError::DuplicateActivity("milk".to_string()));
    assert!(store.contains(&retagged));
}

#[test]
fn insertion_order_is_preserved_and_snapshots_are_detached() {
    let mut store = ActivityStore::new();
    for title in ["c", "a", "b"] {
        store.add(Activity::task(title).unwrap()).unwrap();
    }
    let snapshot = store.snapshot();
    store.reset_data(Vec::new());

    let titles = snapshot
        .activities()
        .iter()
        .map(Activity::title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["c", "a", "b"]);
    assert!(store.is_empty());
    assert!(!store.contains_title("a"));
}
