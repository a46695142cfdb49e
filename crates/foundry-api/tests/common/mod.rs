//! Common test utilities for foundry-api tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use foundry_api::{AppState, routes};
use foundry_config::GatewayConfig;
use foundry_executor::test_utils::RecordingRunner;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`

/// A router over a temporary workspace root, with a recording runner.
pub struct TestApp {
    pub root: TempDir,
    pub runner: Arc<RecordingRunner>,
    pub app: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_runner(RecordingRunner::new())
    }

    pub fn with_runner(runner: RecordingRunner) -> Self {
        let root = tempfile::tempdir().expect("Failed to create workspace root");
        let runner = Arc::new(runner);
        let config = GatewayConfig {
            workspace_root: root.path().to_path_buf(),
            ..GatewayConfig::default()
        };
        let app = routes::router(AppState::with_runner(config, runner.clone()));

        Self { root, runner, app }
    }

    pub fn project_dir(&self, id: &str) -> PathBuf {
        self.root.path().join(id)
    }

    /// Lay out a project directory the way a clone of an engine project would.
    pub fn make_project(&self, id: &str, with_presets: bool) -> PathBuf {
        make_project(self.root.path(), id, with_presets)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

pub fn make_project(root: &Path, id: &str, with_presets: bool) -> PathBuf {
    let dir = root.join(id);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("project.godot"), "config_version=5\n").unwrap();
    if with_presets {
        std::fs::write(dir.join("export_presets.cfg"), "[preset.0]\nname=\"Linux/X11\"\n").unwrap();
    }
    dir
}
