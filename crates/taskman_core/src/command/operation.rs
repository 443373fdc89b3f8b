//! Operation contract shared by the parser and the pipeline.

use crate::command::parser::ParseError;
use crate::history::{HistoryError, HistoryManager};
use crate::model::activity::ActivityValidationError;
use crate::store::activity_store::{ActivityStore, StoreError};
use crate::view::descriptor::ViewKind;
use crate::view::engine::SharedViews;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Feedback message on success, typed failure otherwise.
pub type CommandOutcome = Result<String, CommandError>;

/// Every way a command can fail, surfaced to the caller as a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Parse(ParseError),
    Store(StoreError),
    History(HistoryError),
    Validation(ActivityValidationError),
    /// 1-based row index outside the view as currently shown.
    InvalidIndex { view: ViewKind, index: usize },
}

impl CommandError {
    /// Stable machine-readable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse_error",
            Self::Store(StoreError::DuplicateActivity(_)) => "duplicate_activity",
            Self::Store(StoreError::ActivityNotFound(_)) => "activity_not_found",
            Self::History(HistoryError::NoHistory) => "no_history",
            Self::Validation(_) => "invalid_activity",
            Self::InvalidIndex { .. } => "invalid_index",
        }
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::History(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidIndex { view, index } => {
                write!(f, "no activity at index {index} in the {view} view")
            }
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::History(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidIndex { .. } => None,
        }
    }
}

impl From<ParseError> for CommandError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<StoreError> for CommandError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<HistoryError> for CommandError {
    fn from(value: HistoryError) -> Self {
        Self::History(value)
    }
}

impl From<ActivityValidationError> for CommandError {
    fn from(value: ActivityValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Collaborators an operation may touch while executing.
pub struct CommandContext<'a> {
    pub store: &'a mut ActivityStore,
    pub views: &'a SharedViews,
    pub history: &'a mut HistoryManager,
}

/// A parsed, ready-to-run command.
pub trait Operation: Debug {
    /// Runs against the context, returning user-facing feedback.
    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandOutcome;

    /// Whether a successful run should be recorded for undo.
    fn is_history_worthy(&self) -> bool;
}

/// Result envelope returned to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub succeeded: bool,
    pub feedback: String,
}

impl CommandResult {
    pub fn success(feedback: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            feedback: feedback.into(),
        }
    }

    pub fn failure(feedback: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            feedback: feedback.into(),
        }
    }
}
