//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate parse -> snapshot -> execute -> history for each command.
//! - Wire store, views, history and persistence into one session.
//! - Keep presentation layers decoupled from storage details.
//!
//! # See also
//! - `command` for the operation contract.
//! - `repo` for the persistence collaborator.

pub mod command_pipeline;
pub mod session;
