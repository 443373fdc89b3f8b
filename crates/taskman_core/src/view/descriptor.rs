//! Typed view descriptors.
//!
//! Each view kind owns exactly one key function. It returns the sort key
//! for members and `None` for everything else, so membership and ordering
//! cannot drift apart and sorting never meets a record lacking its key.

use crate::model::activity::{Activity, EpochSecond};
use crate::search::query::ActivityQuery;
use std::fmt::{Display, Formatter};

/// Presentation panel kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewKind {
    /// Anything with a schedule, by schedule start.
    Schedule,
    /// Tasks with a deadline, by deadline.
    Deadline,
    /// Tasks without a deadline, by title.
    Floating,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [ViewKind::Schedule, ViewKind::Deadline, ViewKind::Floating];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Schedule => "schedule",
            Self::Deadline => "deadline",
            Self::Floating => "floating",
        }
    }

    /// Parses a view name or its one-letter short form.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "schedule" | "s" => Some(Self::Schedule),
            "deadline" | "d" => Some(Self::Deadline),
            "floating" | "f" => Some(Self::Floating),
            _ => None,
        }
    }

    pub fn descriptor(self) -> &'static ViewDescriptor {
        match self {
            Self::Schedule => &SCHEDULE_VIEW,
            Self::Deadline => &DEADLINE_VIEW,
            Self::Floating => &FLOATING_VIEW,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Schedule => 0,
            Self::Deadline => 1,
            Self::Floating => 2,
        }
    }
}

impl Display for ViewKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordering key extracted from a view member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey<'a> {
    Instant(EpochSecond),
    Title(&'a str),
}

/// Membership and ordering of one view, bundled.
pub struct ViewDescriptor {
    kind: ViewKind,
    key_of: for<'a> fn(&'a Activity) -> Option<SortKey<'a>>,
}

static SCHEDULE_VIEW: ViewDescriptor = ViewDescriptor {
    kind: ViewKind::Schedule,
    key_of: schedule_key,
};

static DEADLINE_VIEW: ViewDescriptor = ViewDescriptor {
    kind: ViewKind::Deadline,
    key_of: deadline_key,
};

static FLOATING_VIEW: ViewDescriptor = ViewDescriptor {
    kind: ViewKind::Floating,
    key_of: floating_key,
};

fn schedule_key(activity: &Activity) -> Option<SortKey<'_>> {
    activity
        .schedule()
        .map(|schedule| SortKey::Instant(schedule.start()))
}

fn deadline_key(activity: &Activity) -> Option<SortKey<'_>> {
    if !activity.is_task() {
        return None;
    }
    activity.deadline().map(SortKey::Instant)
}

fn floating_key(activity: &Activity) -> Option<SortKey<'_>> {
    if activity.is_task() && activity.deadline().is_none() {
        Some(SortKey::Title(activity.title()))
    } else {
        None
    }
}

impl ViewDescriptor {
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    /// Sort key for members, `None` for non-members.
    pub fn key<'a>(&self, activity: &'a Activity) -> Option<SortKey<'a>> {
        (self.key_of)(activity)
    }

    /// Baseline membership test, ignoring search terms.
    pub fn admits(&self, activity: &Activity) -> bool {
        self.key(activity).is_some()
    }

    /// Filters `source` by membership and `search`, then sorts by key.
    pub fn project(&self, source: &[Activity], search: Option<&ActivityQuery>) -> Vec<Activity> {
        let mut keyed = source
            .iter()
            .filter_map(|activity| self.key(activity).map(|key| (key, activity)))
            .filter(|(_, activity)| search.map_or(true, |query| query.matches(activity)))
            .collect::<Vec<_>>();
        keyed.sort_by(|left, right| left.0.cmp(&right.0));
        keyed
            .into_iter()
            .map(|(_, activity)| activity.clone())
            .collect()
    }
}
