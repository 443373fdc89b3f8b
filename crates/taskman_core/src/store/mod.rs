//! Canonical in-memory activity storage.
//!
//! # Responsibility
//! - Enforce value and title uniqueness on insert.
//! - Publish full-contents change notifications to dependents (views,
//!   persistence) synchronously after each mutation.
//!
//! # Invariants
//! - The store is the single source of truth; views are derived state.

pub mod activity_store;
