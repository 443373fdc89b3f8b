//! Core domain logic for taskman.
//! This crate is the single source of truth for activity invariants.

pub mod command;
pub mod config;
pub mod db;
pub mod history;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod store;
pub mod view;

pub use command::operation::{CommandContext, CommandError, CommandResult, Operation};
pub use command::parser::{BasicCommandParser, CommandParser, ParseError};
pub use config::{SessionConfig, DEFAULT_HISTORY_CAPACITY};
pub use history::{HistoryEntry, HistoryError, HistoryManager};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::activity::{
    Activity, ActivityKind, ActivityValidationError, EpochSecond, Schedule,
};
pub use model::tag::{Tag, TagError};
pub use repo::activity_repo::{
    ActivityRepository, PersistOnChange, RepoError, RepoResult, SqliteActivityRepository,
};
pub use search::query::ActivityQuery;
pub use service::command_pipeline::CommandPipeline;
pub use service::session::Session;
pub use store::activity_store::{ActivityStore, StoreError, StoreListener, StoreSnapshot};
pub use view::descriptor::{SortKey, ViewDescriptor, ViewKind};
pub use view::engine::{SharedViews, ViewEngine};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
