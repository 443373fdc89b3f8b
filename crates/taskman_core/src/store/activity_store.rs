//! In-memory activity store with synchronous change notification.
//!
//! # Responsibility
//! - Hold the canonical, de-duplicated list of activities.
//! - Notify registered listeners after every successful mutation.
//!
//! # Invariants
//! - No two stored activities are equal by value.
//! - No two stored activities share a title.
//! - Listeners observe the new contents before a mutating call returns.
//! - Failed mutations leave contents untouched and notify nobody.

use crate::model::activity::Activity;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level mutation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert would violate the value or title uniqueness rule.
    DuplicateActivity(String),
    /// No stored activity equals the target.
    ActivityNotFound(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateActivity(title) => {
                write!(f, "an activity titled `{title}` already exists")
            }
            Self::ActivityNotFound(title) => write!(f, "activity not found: `{title}`"),
        }
    }
}

impl Error for StoreError {}

/// Dependent of the store, refreshed with the full contents after each change.
pub trait StoreListener: Send {
    fn on_activities_changed(&mut self, activities: &[Activity]);
}

impl<F> StoreListener for F
where
    F: FnMut(&[Activity]) + Send,
{
    fn on_activities_changed(&mut self, activities: &[Activity]) {
        self(activities)
    }
}

/// Owned copy of store contents, used for undo and initial load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    activities: Vec<Activity>,
}

impl StoreSnapshot {
    pub fn new(activities: Vec<Activity>) -> Self {
        Self { activities }
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn into_activities(self) -> Vec<Activity> {
        self.activities
    }
}

/// Canonical activity collection.
#[derive(Default)]
pub struct ActivityStore {
    activities: Vec<Activity>,
    listeners: Vec<Box<dyn StoreListener>>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from already-valid contents (e.g. persisted data).
    pub fn with_activities(activities: Vec<Activity>) -> Self {
        Self {
            activities,
            listeners: Vec::new(),
        }
    }

    /// Registers a dependent and primes it with the current contents.
    pub fn subscribe(&mut self, mut listener: Box<dyn StoreListener>) {
        listener.on_activities_changed(&self.activities);
        self.listeners.push(listener);
    }

    /// Inserts one activity.
    ///
    /// # Errors
    /// - `DuplicateActivity` when an equal activity or one with the same
    ///   title is already stored.
    pub fn add(&mut self, activity: Activity) -> StoreResult<()> {
        self.ensure_insertable(&activity, None)?;
        debug!(
            "event=store_add module=store status=ok size={}",
            self.activities.len() + 1
        );
        self.activities.push(activity);
        self.notify();
        Ok(())
    }

    /// Removes the activity equal to `target`.
    ///
    /// # Errors
    /// - `ActivityNotFound` when no stored activity equals `target`.
    pub fn remove(&mut self, target: &Activity) -> StoreResult<()> {
        let position = self.position_of(target)?;
        self.activities.remove(position);
        debug!(
            "event=store_remove module=store status=ok size={}",
            self.activities.len()
        );
        self.notify();
        Ok(())
    }

    /// Swaps `target` for `replacement` as one remove + add step.
    ///
    /// Uniqueness of `replacement` is checked against the store without
    /// `target`. Listeners are notified once.
    ///
    /// # Errors
    /// - `ActivityNotFound` when `target` is not stored.
    /// - `DuplicateActivity` when `replacement` clashes with another record.
    pub fn replace(&mut self, target: &Activity, replacement: Activity) -> StoreResult<()> {
        let position = self.position_of(target)?;
        self.ensure_insertable(&replacement, Some(position))?;
        self.activities.remove(position);
        self.activities.push(replacement);
        debug!(
            "event=store_replace module=store status=ok size={}",
            self.activities.len()
        );
        self.notify();
        Ok(())
    }

    /// Replaces all contents wholesale and notifies once.
    ///
    /// Input is trusted to already satisfy store invariants (initial load or
    /// undo rollback).
    pub fn reset_data(&mut self, activities: Vec<Activity>) {
        self.activities = activities;
        debug!(
            "event=store_reset module=store status=ok size={}",
            self.activities.len()
        );
        self.notify();
    }

    pub fn contains(&self, activity: &Activity) -> bool {
        self.activities.contains(activity)
    }

    pub fn contains_title(&self, title: &str) -> bool {
        self.activities
            .iter()
            .any(|activity| activity.title() == title)
    }

    /// Current contents in insertion order.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::new(self.activities.clone())
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    fn position_of(&self, target: &Activity) -> StoreResult<usize> {
        self.activities
            .iter()
            .position(|activity| activity == target)
            .ok_or_else(|| StoreError::ActivityNotFound(target.title().to_string()))
    }

    fn ensure_insertable(&self, candidate: &Activity, skip: Option<usize>) -> StoreResult<()> {
        let clash = self
            .activities
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != skip)
            .any(|(_, existing)| existing.title() == candidate.title() || existing == candidate);
        if clash {
            return Err(StoreError::DuplicateActivity(candidate.title().to_string()));
        }
        Ok(())
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener.on_activities_changed(&self.activities);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ActivityStore, StoreError};
    use crate::model::activity::Activity;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn failed_add_does_not_notify() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut store = ActivityStore::new();
        store.subscribe(Box::new(move |_: &[Activity]| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        store.add(Activity::task("Ali").unwrap()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let err = store.add(Activity::task("Ali").unwrap()).unwrap_err();
        assert_eq!(err, StoreError::DuplicateActivity("Ali".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn replace_allows_keeping_the_same_title() {
        let mut store = ActivityStore::new();
        let original = Activity::task("Ali").unwrap();
        store.add(original.clone()).unwrap();

        let edited = original.clone().with_deadline(100);
        store.replace(&original, edited.clone()).unwrap();

        assert_eq!(store.activities(), &[edited]);
    }

    #[test]
    fn replace_rejects_clash_with_other_record() {
        let mut store = ActivityStore::new();
        let first = Activity::task("first").unwrap();
        let second = Activity::task("second").unwrap();
        store.add(first.clone()).unwrap();
        store.add(second.clone()).unwrap();

        let renamed = Activity::task("second").unwrap().with_deadline(5);
        let err = store.replace(&first, renamed).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateActivity(_)));
        assert_eq!(store.activities(), &[first, second]);
    }
}
