//! Command execution pipeline.
//!
//! # Responsibility
//! - Turn raw command text into an executed operation and a feedback result.
//! - Record undo history for successful history-worthy operations.
//!
//! # Invariants
//! - The store snapshot is taken before parsing, so the recorded pre-state
//!   is exactly what the operation saw.
//! - Failed or non-history-worthy commands never touch history.
//! - Failures are returned as `CommandResult::failure`, never as panics.

use crate::command::operation::{CommandContext, CommandError, CommandResult};
use crate::command::parser::{BasicCommandParser, CommandParser};
use crate::history::{HistoryEntry, HistoryManager};
use crate::logging::sanitize_message;
use crate::model::activity::Activity;
use crate::store::activity_store::{ActivityStore, StoreListener};
use crate::view::engine::SharedViews;
use log::{info, warn};
use std::time::Instant;

const MAX_LOGGED_COMMAND_CHARS: usize = 80;

/// Owns the store and history; shares the view engine with consumers.
pub struct CommandPipeline<P: CommandParser = BasicCommandParser> {
    parser: P,
    store: ActivityStore,
    views: SharedViews,
    history: HistoryManager,
}

impl CommandPipeline<BasicCommandParser> {
    /// Pipeline over an empty store with the built-in grammar.
    pub fn with_defaults(history_capacity: Option<usize>) -> Self {
        Self::new(
            BasicCommandParser,
            ActivityStore::new(),
            HistoryManager::new(history_capacity),
        )
    }
}

impl<P: CommandParser> CommandPipeline<P> {
    /// Creates a pipeline and registers its view engine with `store`.
    pub fn new(parser: P, mut store: ActivityStore, history: HistoryManager) -> Self {
        let views = SharedViews::new();
        store.subscribe(Box::new(views.clone()));
        Self {
            parser,
            store,
            views,
            history,
        }
    }

    /// Executes one command.
    ///
    /// # Contract
    /// - Parse failures return a failed result; nothing else changes.
    /// - Operation failures return a failed result; the store is unchanged.
    /// - On success, history-worthy commands push
    ///   `(command_text, feedback, pre-state snapshot)`.
    pub fn execute(&mut self, command_text: &str) -> CommandResult {
        let started_at = Instant::now();
        let logged_command = sanitize_message(command_text.trim(), MAX_LOGGED_COMMAND_CHARS);
        let snapshot = self.store.snapshot();

        let outcome = self
            .parser
            .parse(command_text)
            .map_err(CommandError::from)
            .and_then(|operation| {
                let mut ctx = CommandContext {
                    store: &mut self.store,
                    views: &self.views,
                    history: &mut self.history,
                };
                operation
                    .execute(&mut ctx)
                    .map(|feedback| (feedback, operation.is_history_worthy()))
            });

        match outcome {
            Ok((feedback, history_worthy)) => {
                if history_worthy {
                    self.history.push(HistoryEntry::new(
                        command_text.trim(),
                        feedback.clone(),
                        snapshot,
                    ));
                }
                info!(
                    "event=command_execute module=service status=ok command=\"{}\" recorded={} store_size={} history_depth={} duration_ms={}",
                    logged_command,
                    history_worthy,
                    self.store.len(),
                    self.history.len(),
                    started_at.elapsed().as_millis()
                );
                CommandResult::success(feedback)
            }
            Err(err) => {
                warn!(
                    "event=command_execute module=service status=error command=\"{}\" error_code={} duration_ms={}",
                    logged_command,
                    err.code(),
                    started_at.elapsed().as_millis()
                );
                CommandResult::failure(err.to_string())
            }
        }
    }

    /// Registers an additional store dependent, primed with current contents.
    pub fn subscribe(&mut self, listener: Box<dyn StoreListener>) {
        self.store.subscribe(listener);
    }

    /// Read handle to the live projections.
    pub fn views(&self) -> &SharedViews {
        &self.views
    }

    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Current store contents in insertion order.
    pub fn activities(&self) -> &[Activity] {
        self.store.activities()
    }
}

#[cfg(test)]
mod tests {
    use super::CommandPipeline;
    use crate::view::descriptor::ViewKind;

    #[test]
    fn parse_failure_leaves_history_untouched() {
        let mut pipeline = CommandPipeline::with_defaults(None);
        let result = pipeline.execute("frobnicate now");
        assert!(!result.succeeded);
        assert!(result.feedback.contains("unknown command"));
        assert!(pipeline.history().is_empty());
    }

    #[test]
    fn successful_add_records_history_and_refreshes_views() {
        let mut pipeline = CommandPipeline::with_defaults(None);
        let result = pipeline.execute("add task buy milk");
        assert!(result.succeeded, "{}", result.feedback);
        assert_eq!(pipeline.history().len(), 1);
        assert_eq!(pipeline.views().len(ViewKind::Floating), 1);
    }

    #[test]
    fn list_is_not_recorded() {
        let mut pipeline = CommandPipeline::with_defaults(None);
        pipeline.execute("add task buy milk");
        let result = pipeline.execute("list milk");
        assert!(result.succeeded);
        assert_eq!(pipeline.history().len(), 1);
    }
}
