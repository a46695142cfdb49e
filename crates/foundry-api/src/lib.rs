//! HTTP workspace gateway for Foundry.
//!
//! Clones repositories into per-project directories, runs the engine's
//! headless test and export modes against them, and removes them again.

pub mod error;
pub mod extract;
pub mod routes;
pub mod services;
pub mod state;

pub use state::AppState;
