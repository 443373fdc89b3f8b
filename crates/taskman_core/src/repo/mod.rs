//! Persistence collaborator for store contents.
//!
//! # Responsibility
//! - Define the load/save contract the session uses at startup and after
//!   every successful mutation.
//! - Keep SQL details out of the in-memory core.
//!
//! # Invariants
//! - Loaded data is validated before it reaches `ActivityStore`.

pub mod activity_repo;
