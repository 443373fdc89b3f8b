//! Session configuration and option normalization.

use std::path::PathBuf;

/// Undo depth used when no valid capacity is configured.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Options for [`crate::service::session::Session::open`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum number of undoable commands. Defaults to 10.
    pub history_capacity: Option<usize>,
    /// SQLite file used to load and persist activities. `None` keeps the
    /// session purely in memory.
    pub db_path: Option<PathBuf>,
}

impl SessionConfig {
    /// Effective history capacity after normalization.
    pub fn applied_history_capacity(&self) -> usize {
        normalize_history_capacity(self.history_capacity)
    }
}

/// Normalizes history capacity; `None` and `0` fall back to the default.
pub fn normalize_history_capacity(capacity: Option<usize>) -> usize {
    match capacity {
        Some(0) | None => DEFAULT_HISTORY_CAPACITY,
        Some(value) => value,
    }
}
