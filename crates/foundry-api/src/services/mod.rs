//! Workspace services.

pub mod git;
pub mod godot;
pub mod locks;
pub mod workspace;

pub use workspace::{
    BuildOutcome, BuildRequest, CleanupRequest, CloneRequest, TestRequest, WorkspaceGateway,
};
