//! Core domain types and traits for the Foundry workspace gateway.
//!
//! This crate contains:
//! - Project identifiers and the well-known project files
//! - The command invocation record and the `CommandRunner` trait
//! - The crate-wide error type

pub mod command;
pub mod error;
pub mod project;

pub use command::{CommandFailure, CommandOutput, CommandRunner, CommandSpec};
pub use error::{Error, Result};
pub use project::{BuildDir, ProjectId, is_plain_name};
