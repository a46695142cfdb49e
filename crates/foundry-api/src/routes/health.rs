//! Health check endpoints.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::{Value, json};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Ready once the workspace root exists.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let root = state.gateway.root();
    let workspace = root.display().to_string();

    if tokio::fs::metadata(root).await.is_ok_and(|m| m.is_dir()) {
        (
            StatusCode::OK,
            Json(json!({ "status": "ready", "workspace": workspace })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unavailable",
                "workspace": workspace,
                "error": "workspace directory does not exist",
            })),
        )
    }
}
