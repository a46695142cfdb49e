//! API routes.

pub mod health;
pub mod projects;

use crate::AppState;
use axum::Router;

/// Build the main API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(projects::router())
        .merge(health::router())
        .with_state(state)
}
