//! Bounded undo history.
//!
//! # Responsibility
//! - Keep whole-store snapshots taken before history-worthy commands.
//! - Roll the store back to the most recent snapshot on undo.
//!
//! # Invariants
//! - Depth never exceeds capacity; the oldest entry is evicted first.
//! - Undo always consumes the most recent entry.
//! - Memory is O(capacity x store size); no diffing.

use crate::config::normalize_history_capacity;
use crate::store::activity_store::{ActivityStore, StoreSnapshot};
use log::{debug, info};
use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type HistoryResult<T> = Result<T, HistoryError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    /// Undo requested with an empty stack.
    NoHistory,
}

impl Display for HistoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHistory => write!(f, "no more commands to undo"),
        }
    }
}

impl Error for HistoryError {}

/// One undoable command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Raw command text as entered.
    pub command_text: String,
    /// Feedback message the command produced.
    pub feedback: String,
    /// Store contents captured before the command ran.
    pub snapshot: StoreSnapshot,
}

impl HistoryEntry {
    pub fn new(
        command_text: impl Into<String>,
        feedback: impl Into<String>,
        snapshot: StoreSnapshot,
    ) -> Self {
        Self {
            command_text: command_text.into(),
            feedback: feedback.into(),
            snapshot,
        }
    }
}

/// Capacity-bounded LIFO stack of [`HistoryEntry`].
#[derive(Debug, Clone)]
pub struct HistoryManager {
    capacity: usize,
    // Front is the most recent entry.
    entries: VecDeque<HistoryEntry>,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl HistoryManager {
    /// Creates an empty history. `None`/`0` capacity means the default.
    pub fn new(capacity: Option<usize>) -> Self {
        let capacity = normalize_history_capacity(capacity);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from most recent to oldest.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Pushes `entry`, evicting the oldest one when at capacity.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                debug!(
                    "event=history_evict module=history status=ok snapshot_size={}",
                    evicted.snapshot.len()
                );
            }
        }
        self.entries.push_front(entry);
    }

    /// Pops the most recent entry without touching any store.
    pub fn pop(&mut self) -> HistoryResult<HistoryEntry> {
        self.entries.pop_front().ok_or(HistoryError::NoHistory)
    }

    /// Restores `store` to the most recent snapshot.
    ///
    /// Returns the undone entry; its `feedback` is the original message.
    ///
    /// # Errors
    /// - `NoHistory` when nothing is left to undo.
    pub fn undo(&mut self, store: &mut ActivityStore) -> HistoryResult<HistoryEntry> {
        let entry = self.pop()?;
        store.reset_data(entry.snapshot.activities().to_vec());
        info!(
            "event=history_undo module=history status=ok remaining={} restored_size={}",
            self.entries.len(),
            entry.snapshot.len()
        );
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::{HistoryEntry, HistoryError, HistoryManager};
    use crate::store::activity_store::StoreSnapshot;

    fn entry(label: &str) -> HistoryEntry {
        HistoryEntry::new(label, format!("done {label}"), StoreSnapshot::default())
    }

    #[test]
    fn push_evicts_oldest_at_capacity() {
        let mut history = HistoryManager::new(Some(2));
        history.push(entry("one"));
        history.push(entry("two"));
        history.push(entry("three"));

        let texts = history
            .entries()
            .map(|entry| entry.command_text.as_str())
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["three", "two"]);
    }

    #[test]
    fn pop_on_empty_reports_no_history() {
        let mut history = HistoryManager::default();
        assert_eq!(history.capacity(), 10);
        assert_eq!(history.pop().unwrap_err(), HistoryError::NoHistory);
    }
}
