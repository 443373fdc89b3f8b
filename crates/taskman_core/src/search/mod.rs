//! Search predicates over activities.
//!
//! # Responsibility
//! - Evaluate keyword/tag search terms against a single activity.
//! - Stay stateless so the same predicate serves ad-hoc listing and
//!   per-view search filters.

pub mod query;
