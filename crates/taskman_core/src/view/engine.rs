//! View engine and its shared handle.
//!
//! # Responsibility
//! - Keep the three projections in sync with the latest store contents.
//! - Layer optional search filters over each view's membership rule.
//!
//! # Invariants
//! - Every store notification and every filter change recomputes rows
//!   before returning.
//! - `SharedViews` is the only path to rows from outside this module and
//!   only hands out read access.

use crate::model::activity::Activity;
use crate::search::query::ActivityQuery;
use crate::store::activity_store::StoreListener;
use crate::view::descriptor::{ViewDescriptor, ViewKind};
use log::debug;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

struct ViewPanel {
    descriptor: &'static ViewDescriptor,
    search: Option<ActivityQuery>,
    rows: Vec<Activity>,
}

impl ViewPanel {
    fn new(kind: ViewKind) -> Self {
        Self {
            descriptor: kind.descriptor(),
            search: None,
            rows: Vec::new(),
        }
    }

    fn recompute(&mut self, source: &[Activity]) {
        self.rows = self.descriptor.project(source, self.search.as_ref());
    }
}

/// Holds the latest store contents and the derived projections.
pub struct ViewEngine {
    source: Vec<Activity>,
    panels: [ViewPanel; 3],
}

impl Default for ViewEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewEngine {
    pub fn new() -> Self {
        Self {
            source: Vec::new(),
            panels: ViewKind::ALL.map(ViewPanel::new),
        }
    }

    /// Recomputes every projection from new store contents.
    pub fn refresh(&mut self, activities: &[Activity]) {
        self.source = activities.to_vec();
        for panel in &mut self.panels {
            panel.recompute(&self.source);
        }
        debug!(
            "event=views_refresh module=view status=ok schedule={} deadline={} floating={}",
            self.panels[0].rows.len(),
            self.panels[1].rows.len(),
            self.panels[2].rows.len()
        );
    }

    /// Replaces the search filter of one view.
    ///
    /// An unfiltered query is stored as "no filter".
    pub fn set_search_filter(&mut self, kind: ViewKind, query: ActivityQuery) {
        let search = if query.is_unfiltered() {
            None
        } else {
            Some(query)
        };
        let panel = &mut self.panels[kind.index()];
        panel.search = search;
        panel.recompute(&self.source);
    }

    /// Reverts one view to its membership rule only.
    pub fn clear_search_filter(&mut self, kind: ViewKind) {
        let panel = &mut self.panels[kind.index()];
        panel.search = None;
        panel.recompute(&self.source);
    }

    pub fn rows(&self, kind: ViewKind) -> &[Activity] {
        &self.panels[kind.index()].rows
    }

    pub fn search_filter(&self, kind: ViewKind) -> Option<&ActivityQuery> {
        self.panels[kind.index()].search.as_ref()
    }
}

/// Cloneable, thread-safe handle to one [`ViewEngine`].
///
/// Register a clone with the store via `ActivityStore::subscribe`; hand other
/// clones to consumers.
#[derive(Clone, Default)]
pub struct SharedViews {
    inner: Arc<RwLock<ViewEngine>>,
}

impl SharedViews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Owned copy of one view's rows.
    pub fn list(&self, kind: ViewKind) -> Vec<Activity> {
        self.read().rows(kind).to_vec()
    }

    /// Runs `f` against one view's rows without copying them.
    pub fn with_view<R>(&self, kind: ViewKind, f: impl FnOnce(&[Activity]) -> R) -> R {
        f(self.read().rows(kind))
    }

    pub fn len(&self, kind: ViewKind) -> usize {
        self.read().rows(kind).len()
    }

    /// Row at 1-based `index`, as currently displayed.
    pub fn get(&self, kind: ViewKind, index: usize) -> Option<Activity> {
        let position = index.checked_sub(1)?;
        self.read().rows(kind).get(position).cloned()
    }

    pub fn search_filter(&self, kind: ViewKind) -> Option<ActivityQuery> {
        self.read().search_filter(kind).cloned()
    }

    pub fn set_search_filter(&self, kind: ViewKind, query: ActivityQuery) {
        self.write().set_search_filter(kind, query);
    }

    pub fn clear_search_filter(&self, kind: ViewKind) {
        self.write().clear_search_filter(kind);
    }

    /// Applies one filter to all views under a single lock.
    pub fn set_search_filter_all(&self, query: ActivityQuery) {
        let mut engine = self.write();
        for kind in ViewKind::ALL {
            engine.set_search_filter(kind, query.clone());
        }
    }

    pub fn clear_search_filter_all(&self) {
        let mut engine = self.write();
        for kind in ViewKind::ALL {
            engine.clear_search_filter(kind);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ViewEngine> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ViewEngine> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StoreListener for SharedViews {
    fn on_activities_changed(&mut self, activities: &[Activity]) {
        self.write().refresh(activities);
    }
}

#[cfg(test)]
mod tests {
    use super::ViewEngine;
    use crate::model::activity::Activity;
    use crate::search::query::ActivityQuery;
    use crate::view::descriptor::ViewKind;

    #[test]
    fn filter_change_recomputes_from_cached_source() {
        let mut engine = ViewEngine::new();
        engine.refresh(&[
            Activity::task("write report").unwrap(),
            Activity::task("buy milk").unwrap(),
        ]);
        assert_eq!(engine.rows(ViewKind::Floating).len(), 2);

        engine.set_search_filter(ViewKind::Floating, ActivityQuery::new(["report"], [""; 0]));
        assert_eq!(engine.rows(ViewKind::Floating).len(), 1);
        assert_eq!(engine.rows(ViewKind::Floating)[0].title(), "write report");

        engine.clear_search_filter(ViewKind::Floating);
        assert_eq!(engine.rows(ViewKind::Floating).len(), 2);
        assert!(engine.search_filter(ViewKind::Floating).is_none());
    }

    #[test]
    fn unfiltered_query_is_stored_as_no_filter() {
        let mut engine = ViewEngine::new();
        engine.set_search_filter(ViewKind::Deadline, ActivityQuery::new([""], [""; 0]));
        assert!(engine.search_filter(ViewKind::Deadline).is_none());
    }
}
