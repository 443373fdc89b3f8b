//! Activity domain model.
//!
//! # Responsibility
//! - Define the immutable record shared by schedule/deadline/floating views.
//! - Validate records at construction and deserialization time.
//!
//! # Invariants
//! - `title` is trimmed and never empty.
//! - `schedule.end` is never earlier than `schedule.start`.
//! - `ActivityKind::Event` always carries a schedule.
//! - Equality covers every field; tag order never matters.

use crate::model::tag::Tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Unix epoch seconds.
pub type EpochSecond = i64;

/// Activity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Actionable item, optionally due by a deadline.
    Task,
    /// Calendar entry bound to a time window.
    Event,
}

impl ActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Event => "event",
        }
    }
}

/// Closed time window `[start, end]` in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Schedule {
    start: EpochSecond,
    end: EpochSecond,
}

impl Schedule {
    pub fn new(start: EpochSecond, end: EpochSecond) -> Result<Self, ActivityValidationError> {
        if end < start {
            return Err(ActivityValidationError::InvalidScheduleWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> EpochSecond {
        self.start
    }

    pub fn end(&self) -> EpochSecond {
        self.end
    }
}

/// Model-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    EmptyTitle,
    InvalidScheduleWindow {
        start: EpochSecond,
        end: EpochSecond,
    },
    EventWithoutSchedule,
}

impl Display for ActivityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "activity title must not be empty"),
            Self::InvalidScheduleWindow { start, end } => {
                write!(f, "schedule end ({end}) must be >= schedule start ({start})")
            }
            Self::EventWithoutSchedule => write!(f, "an event must have a schedule"),
        }
    }
}

impl Error for ActivityValidationError {}

/// Canonical task/event record.
///
/// Values are never mutated in place. Builder-style methods consume `self`
/// and return a new value, so an edit is always "remove old, add new" from
/// the store's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ActivityWire", into = "ActivityWire")]
pub struct Activity {
    title: String,
    kind: ActivityKind,
    deadline: Option<EpochSecond>,
    schedule: Option<Schedule>,
    tags: BTreeSet<Tag>,
}

impl Activity {
    /// Creates an unscheduled task without deadline or tags.
    pub fn task(title: impl Into<String>) -> Result<Self, ActivityValidationError> {
        Self::from_parts(ActivityKind::Task, title.into(), None, None, BTreeSet::new())
    }

    /// Creates an event occupying `schedule`.
    pub fn event(
        title: impl Into<String>,
        schedule: Schedule,
    ) -> Result<Self, ActivityValidationError> {
        Self::from_parts(
            ActivityKind::Event,
            title.into(),
            None,
            Some(schedule),
            BTreeSet::new(),
        )
    }

    fn from_parts(
        kind: ActivityKind,
        title: String,
        deadline: Option<EpochSecond>,
        schedule: Option<Schedule>,
        tags: BTreeSet<Tag>,
    ) -> Result<Self, ActivityValidationError> {
        let activity = Self {
            title: title.trim().to_string(),
            kind,
            deadline,
            schedule,
            tags,
        };
        activity.validate()?;
        Ok(activity)
    }

    /// Returns a copy due at `deadline`.
    pub fn with_deadline(mut self, deadline: EpochSecond) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns a copy occupying `schedule`.
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Returns a copy whose tag set is exactly `tags`.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Checks record-level invariants.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `InvalidScheduleWindow` when the schedule ends before it starts.
    /// - `EventWithoutSchedule` for an event lacking a schedule.
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        if self.title.trim().is_empty() {
            return Err(ActivityValidationError::EmptyTitle);
        }
        if let Some(schedule) = self.schedule {
            Schedule::new(schedule.start, schedule.end)?;
        }
        if self.kind == ActivityKind::Event && self.schedule.is_none() {
            return Err(ActivityValidationError::EventWithoutSchedule);
        }
        Ok(())
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    pub fn deadline(&self) -> Option<EpochSecond> {
        self.deadline
    }

    pub fn schedule(&self) -> Option<Schedule> {
        self.schedule
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    pub fn is_task(&self) -> bool {
        self.kind == ActivityKind::Task
    }
}

impl Display for Activity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.title, self.kind.as_str())?;
        if let Some(deadline) = self.deadline {
            write!(f, " due={deadline}")?;
        }
        if let Some(schedule) = self.schedule {
            write!(f, " at={}..{}", schedule.start, schedule.end)?;
        }
        for tag in &self.tags {
            write!(f, " #{tag}")?;
        }
        Ok(())
    }
}

/// Serialized shape of [`Activity`]. Decoding goes through validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ActivityWire {
    title: String,
    kind: ActivityKind,
    #[serde(default)]
    deadline: Option<EpochSecond>,
    #[serde(default)]
    schedule: Option<Schedule>,
    #[serde(default)]
    tags: BTreeSet<Tag>,
}

impl TryFrom<ActivityWire> for Activity {
    type Error = ActivityValidationError;

    fn try_from(value: ActivityWire) -> Result<Self, Self::Error> {
        Self::from_parts(
            value.kind,
            value.title,
            value.deadline,
            value.schedule,
            value.tags,
        )
    }
}

impl From<Activity> for ActivityWire {
    fn from(value: Activity) -> Self {
        Self {
            title: value.title,
            kind: value.kind,
            deadline: value.deadline,
            schedule: value.schedule,
            tags: value.tags,
        }
    }
}
