//! Live, read-only projections of the activity store.
//!
//! # Responsibility
//! - Describe each view as one typed unit (membership + ordering).
//! - Recompute projections eagerly on store changes and filter changes.
//!
//! # Invariants
//! - A projection only ever contains members of its view.
//! - Rows are non-decreasing by the view's sort key; ties keep store order.
//! - Consumers never get mutable access to rows.

pub mod descriptor;
pub mod engine;
