//! Activity persistence contract and SQLite implementation.
//!
//! # Responsibility
//! - Load the persisted store contents once at startup.
//! - Save the full store contents after every successful mutation.
//!
//! # Invariants
//! - Saves replace all rows in one transaction; rows keep store order.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::activity::{Activity, ActivityKind, ActivityValidationError, Schedule};
use crate::model::tag::Tag;
use crate::store::activity_store::StoreListener;
use log::{debug, error};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-layer error.
#[derive(Debug)]
pub enum RepoError {
    Validation(ActivityValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted activity data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ActivityValidationError> for RepoError {
    fn from(value: ActivityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable storage for full store contents.
pub trait ActivityRepository {
    fn load_activities(&self) -> RepoResult<Vec<Activity>>;
    fn save_activities(&mut self, activities: &[Activity]) -> RepoResult<()>;
}

/// SQLite-backed activity repository owning its connection.
pub struct SqliteActivityRepository {
    conn: Connection,
}

impl SqliteActivityRepository {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ActivityRepository for SqliteActivityRepository {
    fn load_activities(&self) -> RepoResult<Vec<Activity>> {
        let mut stmt = self.conn.prepare(
            "SELECT title, kind, deadline, schedule_start, schedule_end
             FROM activities
             ORDER BY position ASC, title ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut activities = Vec::new();
        while let Some(row) = rows.next()? {
            activities.push(parse_activity_row(&self.conn, row)?);
        }
        debug!(
            "event=repo_load module=repo status=ok count={}",
            activities.len()
        );
        Ok(activities)
    }

    fn save_activities(&mut self, activities: &[Activity]) -> RepoResult<()> {
        let started_at = Instant::now();
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM activity_tags;", [])?;
        tx.execute("DELETE FROM activities;", [])?;

        for (position, activity) in activities.iter().enumerate() {
            let schedule = activity.schedule();
            tx.execute(
                "INSERT INTO activities (
                    title,
                    position,
                    kind,
                    deadline,
                    schedule_start,
                    schedule_end
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    activity.title(),
                    i64::try_from(position).unwrap_or(i64::MAX),
                    activity.kind().as_str(),
                    activity.deadline(),
                    schedule.map(|value| value.start()),
                    schedule.map(|value| value.end()),
                ],
            )?;
            for tag in activity.tags() {
                tx.execute(
                    "INSERT INTO activity_tags (activity_title, tag) VALUES (?1, ?2);",
                    params![activity.title(), tag.as_str()],
                )?;
            }
        }

        tx.commit()?;
        debug!(
            "event=repo_save module=repo status=ok count={} duration_ms={}",
            activities.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

/// Store listener that persists every change through a repository.
///
/// The priming call made by `ActivityStore::subscribe` is skipped, since it
/// only replays contents that were just loaded. Save failures are logged and
/// never surface to the command that triggered them.
pub struct PersistOnChange<R> {
    repo: R,
    primed: bool,
}

impl<R: ActivityRepository> PersistOnChange<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            primed: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.repo
    }
}

impl<R: ActivityRepository + Send> StoreListener for PersistOnChange<R> {
    fn on_activities_changed(&mut self, activities: &[Activity]) {
        if !self.primed {
            self.primed = true;
            return;
        }
        if let Err(err) = self.repo.save_activities(activities) {
            error!(
                "event=repo_save module=repo status=error error_code=save_failed count={} error={}",
                activities.len(),
                err
            );
        }
    }
}

fn parse_activity_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Activity> {
    let title: String = row.get("title")?;
    let kind_text: String = row.get("kind")?;
    let kind = parse_kind(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid kind `{kind_text}` in activities.kind"))
    })?;
    let deadline: Option<i64> = row.get("deadline")?;
    let schedule = match (
        row.get::<_, Option<i64>>("schedule_start")?,
        row.get::<_, Option<i64>>("schedule_end")?,
    ) {
        (Some(start), Some(end)) => Some(Schedule::new(start, end)?),
        (None, None) => None,
        _ => {
            return Err(RepoError::InvalidData(format!(
                "half-open schedule for activity `{title}`"
            )));
        }
    };
    let tags = load_tags(conn, &title)?;

    let activity = match (kind, schedule) {
        (ActivityKind::Event, Some(schedule)) => Activity::event(title, schedule)?,
        (ActivityKind::Event, None) => return Err(ActivityValidationError::EventWithoutSchedule.into()),
        (ActivityKind::Task, Some(schedule)) => Activity::task(title)?.with_schedule(schedule),
        (ActivityKind::Task, None) => Activity::task(title)?,
    };
    let activity = match deadline {
        Some(deadline) => activity.with_deadline(deadline),
        None => activity,
    };
    Ok(activity.with_tags(tags))
}

fn load_tags(conn: &Connection, title: &str) -> RepoResult<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT tag FROM activity_tags WHERE activity_title = ?1 ORDER BY tag ASC;",
    )?;
    let mut rows = stmt.query([title])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        let tag = Tag::parse(&value).map_err(|err| {
            RepoError::InvalidData(format!("{err} in activity_tags.tag for `{title}`"))
        })?;
        tags.push(tag);
    }
    Ok(tags)
}

fn parse_kind(value: &str) -> Option<ActivityKind> {
    match value {
        "task" => Some(ActivityKind::Task),
        "event" => Some(ActivityKind::Event),
        _ => None,
    }
}
