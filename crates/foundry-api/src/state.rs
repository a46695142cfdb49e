//! Application state.

use crate::services::WorkspaceGateway;
use foundry_config::GatewayConfig;
use foundry_core::CommandRunner;
use foundry_executor::LocalProcessRunner;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<WorkspaceGateway>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_runner(config, Arc::new(LocalProcessRunner::new()))
    }

    /// Build state around a specific runner, e.g. a recording one in tests.
    pub fn with_runner(config: GatewayConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            gateway: Arc::new(WorkspaceGateway::new(&config, runner)),
        }
    }
}
