use serde_json::json;
use taskman_core::{Activity, ActivityKind, ActivityValidationError, Schedule, Tag, TagError};

#[test]
fn task_title_is_trimmed_and_blank_titles_are_rejected() {
    let task = Activity::task("  write report  ").unwrap();
    assert_eq!(task.title(), "write report");
    assert_eq!(task.kind(), ActivityKind::Task);

    assert_eq!(
        Activity::task("   ").unwrap_err(),
        ActivityValidationError::EmptyTitle
    );
}

#[test]
fn schedule_window_must_not_end_before_start() {
    assert!(Schedule::new(10, 10).is_ok());
    assert_eq!(
        Schedule::new(20, 10).unwrap_err(),
        ActivityValidationError::InvalidScheduleWindow { start: 20, end: 10 }
    );
}

#[test]
fn equality_is_structural_and_ignores_tag_insertion_order() {
    let first = Activity::task("groceries")
        .unwrap()
        .with_tags([Tag::parse("home").unwrap(), Tag::parse("weekly").unwrap()]);
    let second = Activity::task("groceries")
        .unwrap()
        .with_tags([Tag::parse("weekly").unwrap(), Tag::parse("home").unwrap()]);
    assert_eq!(first, second);

    let with_deadline = second.clone().with_deadline(100);
    assert_ne!(first, with_deadline);
    assert_eq!(first.title(), with_deadline.title());
}

#[test]
fn tag_names_must_be_alphanumeric_words() {
    assert_eq!(Tag::parse(" friends ").unwrap().as_str(), "friends");
    assert_eq!(
        Tag::parse("no-dash").unwrap_err(),
        TagError::InvalidTagName("no-dash".to_string())
    );
    assert!(Tag::parse("").is_err());
    assert!(Tag::parse("two words").is_err());
}

#[test]
fn activity_serializes_to_flat_wire_shape() {
    let event = Activity::event("standup", Schedule::new(900, 1800).unwrap())
        .unwrap()
        .with_tags([Tag::parse("work").unwrap()]);

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(
        value,
        json!({
            "title": "standup",
            "kind": "event",
            "deadline": null,
            "schedule": { "start": 900, "end": 1800 },
            "tags": ["work"]
        })
    );

    let decoded: Activity = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, event);
}

#[test]
fn deserialization_revalidates_records() {
    let unscheduled_event = json!({ "title": "party", "kind": "event" });
    let err = serde_json::from_value::<Activity>(unscheduled_event).unwrap_err();
    assert!(err.to_string().contains("schedule"), "unexpected: {err}");

    let bad_tag = json!({ "title": "party", "kind": "task", "tags": ["not valid"] });
    assert!(serde_json::from_value::<Activity>(bad_tag).is_err());

    let blank_title = json!({ "title": "  ", "kind": "task" });
    assert!(serde_json::from_value::<Activity>(blank_title).is_err());
}

#[test]
fn display_lists_kind_instants_and_tags() {
    let task = Activity::task("report")
        .unwrap()
        .with_deadline(50)
        .with_schedule(Schedule::new(10, 20).unwrap())
        .with_tags([Tag::parse("work").unwrap()]);
    assert_eq!(task.to_string(), "report [task] due=50 at=10..20 #work");
}
