//! Command execution backends for the Foundry workspace gateway.
//!
//! Provides runner implementations for external tools:
//! - Local child processes (production)
//! - A recording runner for tests (`test-utils` feature)

pub mod local;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use foundry_core::command::{CommandFailure, CommandOutput, CommandRunner, CommandSpec};
pub use local::LocalProcessRunner;
