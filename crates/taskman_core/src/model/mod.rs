//! Domain model for task/event activities.
//!
//! # Responsibility
//! - Define the immutable record stored by `ActivityStore`.
//! - Own value-level validation (titles, schedule windows, tag names).
//!
//! # Invariants
//! - Records are plain values; equality is structural.
//! - Any edit produces a new value instead of mutating a stored one.

pub mod activity;
pub mod tag;
