//! Built-in operations.
//!
//! Mutating operations (`add`, `delete`, `tag`) are history-worthy; `list`,
//! `undo` and `history` are not.

use crate::command::operation::{CommandContext, CommandError, CommandOutcome, Operation};
use crate::model::activity::Activity;
use crate::model::tag::Tag;
use crate::search::query::ActivityQuery;
use crate::view::descriptor::ViewKind;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddActivity {
    pub activity: Activity,
}

impl Operation for AddActivity {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandOutcome {
        ctx.store.add(self.activity.clone())?;
        Ok(format!("New activity added: {}", self.activity))
    }

    fn is_history_worthy(&self) -> bool {
        true
    }
}

/// Deletes the row at a 1-based index of a view, as currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteActivity {
    pub view: ViewKind,
    pub index: usize,
}

impl Operation for DeleteActivity {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandOutcome {
        let target = resolve_row(ctx, self.view, self.index)?;
        ctx.store.remove(&target)?;
        Ok(format!("Deleted activity: {target}"))
    }

    fn is_history_worthy(&self) -> bool {
        true
    }
}

/// Replaces the full tag set of one displayed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetagActivity {
    pub view: ViewKind,
    pub index: usize,
    pub tags: BTreeSet<Tag>,
}

impl Operation for RetagActivity {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandOutcome {
        let target = resolve_row(ctx, self.view, self.index)?;
        let edited = target.clone().with_tags(self.tags.iter().cloned());
        let feedback = format!("Updated activity: {edited}");
        ctx.store.replace(&target, edited)?;
        Ok(feedback)
    }

    fn is_history_worthy(&self) -> bool {
        true
    }
}

/// Sets or clears the search filter of one view, or of all views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListActivities {
    pub view: Option<ViewKind>,
    pub query: ActivityQuery,
}

impl Operation for ListActivities {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandOutcome {
        let unfiltered = self.query.is_unfiltered();
        let kinds = match self.view {
            Some(kind) => {
                if unfiltered {
                    ctx.views.clear_search_filter(kind);
                } else {
                    ctx.views.set_search_filter(kind, self.query.clone());
                }
                vec![kind]
            }
            None => {
                if unfiltered {
                    ctx.views.clear_search_filter_all();
                } else {
                    ctx.views.set_search_filter_all(self.query.clone());
                }
                ViewKind::ALL.to_vec()
            }
        };

        if unfiltered {
            return Ok("Listed all activities".to_string());
        }
        let shown = kinds
            .into_iter()
            .map(|kind| ctx.views.len(kind))
            .sum::<usize>();
        Ok(format!("{shown} activities listed"))
    }

    fn is_history_worthy(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoLast;

impl Operation for UndoLast {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandOutcome {
        let entry = ctx.history.undo(ctx.store)?;
        Ok(format!(
            "Undid `{}` (was: {})",
            entry.command_text, entry.feedback
        ))
    }

    fn is_history_worthy(&self) -> bool {
        false
    }
}

/// Lists undoable command texts, most recent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowHistory;

impl Operation for ShowHistory {
    fn execute(&self, ctx: &mut CommandContext<'_>) -> CommandOutcome {
        if ctx.history.is_empty() {
            return Ok("No commands to undo".to_string());
        }
        let lines = ctx
            .history
            .entries()
            .enumerate()
            .map(|(position, entry)| format!("{}. {}", position + 1, entry.command_text))
            .collect::<Vec<_>>();
        Ok(format!("Undoable commands:\n{}", lines.join("\n")))
    }

    fn is_history_worthy(&self) -> bool {
        false
    }
}

fn resolve_row(
    ctx: &CommandContext<'_>,
    view: ViewKind,
    index: usize,
) -> Result<Activity, CommandError> {
    ctx.views
        .get(view, index)
        .ok_or(CommandError::InvalidIndex { view, index })
}
