use taskman_core::{
    Activity, ActivityStore, CommandPipeline, HistoryEntry, HistoryError, HistoryManager,
};

#[test]
fn undo_on_empty_history_fails_with_no_history() {
    let mut history = HistoryManager::new(Some(3));
    let mut store = ActivityStore::new();
    assert_eq!(history.undo(&mut store).unwrap_err(), HistoryError::NoHistory);
}

#[test]
fn undo_restores_exact_pre_operation_contents() {
    let mut store = ActivityStore::new();
    store.add(Activity::task("keep").unwrap()).unwrap();
    let mut history = HistoryManager::default();

    let before = store.snapshot();
    store.add(Activity::task("transient").unwrap()).unwrap();
    history.push(HistoryEntry::new("add task transient", "added", before.clone()));

    let entry = history.undo(&mut store).unwrap();
    assert_eq!(entry.feedback, "added");
    assert_eq!(store.snapshot(), before);
}

#[test]
fn capacity_bounds_depth_and_evicts_oldest_first() {
    let mut history = HistoryManager::new(Some(2));
    for text in ["one", "two", "three"] {
        history.push(HistoryEntry::new(text, text, Default::default()));
    }
    assert_eq!(history.len(), 2);
    let texts = history
        .entries()
        .map(|entry| entry.command_text.as_str())
        .collect::<Vec<_>>();
    assert_eq!(texts, vec!["three", "two"]);
}

#[test]
fn zero_capacity_falls_back_to_default() {
    assert_eq!(HistoryManager::new(Some(0)).capacity(), 10);
    assert_eq!(HistoryManager::new(None).capacity(), 10);
}

#[test]
fn eleven_commands_with_capacity_ten_lose_only_the_first_pre_state() {
    let mut pipeline = CommandPipeline::with_defaults(Some(10));
    for n in 1..=11 {
        let result = pipeline.execute(&format!("add task item{n}"));
        assert!(result.succeeded, "{}", result.feedback);
    }
    assert_eq!(pipeline.history().len(), 10);

    for _ in 0..10 {
        assert!(pipeline.execute("undo").succeeded);
    }
    let titles = pipeline
        .activities()
        .iter()
        .map(Activity::title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["item1"]);

    let last = pipeline.execute("undo");
    assert!(!last.succeeded);
    assert_eq!(last.feedback, HistoryError::NoHistory.to_string());
}
