//! Command parsing and execution units.
//!
//! # Responsibility
//! - Define the `Operation` contract (execute + history-worthiness).
//! - Provide the reference parser and built-in operations.
//!
//! # Invariants
//! - Operations mutate the store only through `ActivityStore` APIs.
//! - Expected failures are returned as `CommandError`, never panics.

pub mod operation;
pub mod ops;
pub mod parser;
