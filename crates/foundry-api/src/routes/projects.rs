//! Project workspace endpoints.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use foundry_core::CommandOutput;
use serde::Serialize;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::services::{BuildRequest, CleanupRequest, CloneRequest, TestRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/clone", post(clone_repository))
        .route("/test", post(run_tests))
        .route("/build", post(build_project))
        .route("/cleanup", post(cleanup_project))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct OutputResponse {
    pub message: String,
    pub output: CommandOutput,
}

async fn clone_repository(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CloneRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state
        .gateway
        .provision(req)
        .await
        .map_err(|e| ApiError::from_gateway("Failed to clone repository", e))?;

    Ok(Json(MessageResponse { message }))
}

async fn run_tests(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TestRequest>,
) -> Result<Json<OutputResponse>, ApiError> {
    let output = state
        .gateway
        .run_tests(req)
        .await
        .map_err(|e| ApiError::from_gateway("Failed to execute tests", e))?;

    Ok(Json(OutputResponse {
        message: "Tests executed successfully".to_string(),
        output,
    }))
}

async fn build_project(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BuildRequest>,
) -> Result<Json<OutputResponse>, ApiError> {
    let outcome = state
        .gateway
        .build(req)
        .await
        .map_err(|e| ApiError::from_gateway("Failed to build project", e))?;

    Ok(Json(OutputResponse {
        message: outcome.message(),
        output: outcome.output,
    }))
}

async fn cleanup_project(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CleanupRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state
        .gateway
        .reclaim(req)
        .await
        .map_err(|e| ApiError::from_gateway("Failed to cleanup project directory", e))?;

    Ok(Json(MessageResponse { message }))
}
