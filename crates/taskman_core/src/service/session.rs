//! Session bootstrap: one pipeline plus optional SQLite persistence.
//!
//! # Responsibility
//! - Load persisted activities once at startup.
//! - Register persistence as a store listener so every successful mutation
//!   (undo included) is saved.
//!
//! # Invariants
//! - Loaded activities pass model and store uniqueness checks before use.

use crate::command::operation::CommandResult;
use crate::command::parser::BasicCommandParser;
use crate::config::SessionConfig;
use crate::history::HistoryManager;
use crate::model::activity::Activity;
use crate::repo::activity_repo::{
    ActivityRepository, PersistOnChange, RepoError, RepoResult, SqliteActivityRepository,
};
use crate::service::command_pipeline::CommandPipeline;
use crate::store::activity_store::ActivityStore;
use crate::view::descriptor::ViewKind;
use crate::view::engine::SharedViews;
use log::info;
use std::collections::HashSet;

/// Entry point for presentation layers.
pub struct Session {
    pipeline: CommandPipeline<BasicCommandParser>,
}

impl Session {
    /// Opens a session, backed by SQLite when `config.db_path` is set.
    ///
    /// # Errors
    /// - Propagates database open/migration failures.
    /// - `InvalidData` when persisted rows break store uniqueness.
    pub fn open(config: &SessionConfig) -> RepoResult<Self> {
        let Some(path) = config.db_path.as_ref() else {
            return Ok(Self::in_memory(config));
        };
        let repo = SqliteActivityRepository::open(path)?;
        let session = Self::with_repository(config, repo)?;
        info!(
            "event=session_open module=service status=ok storage=sqlite size={} history_capacity={}",
            session.activities().len(),
            config.applied_history_capacity()
        );
        Ok(session)
    }

    /// Session with no persistence.
    pub fn in_memory(config: &SessionConfig) -> Self {
        let pipeline = CommandPipeline::new(
            BasicCommandParser,
            ActivityStore::new(),
            HistoryManager::new(config.history_capacity),
        );
        Self { pipeline }
    }

    /// Session over any repository implementation.
    pub fn with_repository<R>(config: &SessionConfig, repo: R) -> RepoResult<Self>
    where
        R: ActivityRepository + Send + 'static,
    {
        let activities = repo.load_activities()?;
        ensure_unique_titles(&activities)?;

        let mut pipeline = CommandPipeline::new(
            BasicCommandParser,
            ActivityStore::with_activities(activities),
            HistoryManager::new(config.history_capacity),
        );
        pipeline.subscribe(Box::new(PersistOnChange::new(repo)));
        Ok(Self { pipeline })
    }

    pub fn execute(&mut self, command_text: &str) -> CommandResult {
        self.pipeline.execute(command_text)
    }

    /// Owned copy of one view's rows, in display order.
    pub fn view(&self, kind: ViewKind) -> Vec<Activity> {
        self.pipeline.views().list(kind)
    }

    pub fn views(&self) -> &SharedViews {
        self.pipeline.views()
    }

    pub fn activities(&self) -> &[Activity] {
        self.pipeline.activities()
    }

    pub fn history_len(&self) -> usize {
        self.pipeline.history().len()
    }
}

fn ensure_unique_titles(activities: &[Activity]) -> RepoResult<()> {
    let mut seen = HashSet::with_capacity(activities.len());
    for activity in activities {
        if !seen.insert(activity.title()) {
            return Err(RepoError::InvalidData(format!(
                "duplicate title `{}` in persisted activities",
                activity.title()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::config::SessionConfig;
    use crate::view::descriptor::ViewKind;

    #[test]
    fn in_memory_session_executes_commands() {
        let mut session = Session::in_memory(&SessionConfig::default());
        assert!(session.execute("add task write report d/200").succeeded);
        assert_eq!(session.view(ViewKind::Deadline).len(), 1);
        assert!(session.execute("undo").succeeded);
        assert!(session.activities().is_empty());
    }

    #[test]
    fn open_without_db_path_stays_in_memory() {
        let session = Session::open(&SessionConfig::default()).unwrap();
        assert!(session.activities().is_empty());
        assert_eq!(session.history_len(), 0);
    }
}
