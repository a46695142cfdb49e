//! Integration tests for the workspace gateway endpoints.
//!
//! Drives the router end to end over a temporary workspace root, with a
//! recording runner standing in for git and the engine.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestApp;
use foundry_core::CommandFailure;
use foundry_executor::test_utils::RecordingRunner;
use serde_json::json;

#[tokio::test]
async fn test_clone_endpoint() {
    let t = TestApp::new();

    let (status, body) = t
        .post(
            "/clone",
            json!({ "repoUrl": "https://example.com/r.git", "projectId": "p1" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let target = t.project_dir("p1");
    assert_eq!(
        body["message"],
        format!(
            "Repository https://example.com/r.git cloned successfully into {}",
            target.display()
        )
    );

    let calls = t.runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "git");
    assert_eq!(
        calls[0].args,
        vec![
            "clone".to_string(),
            "--depth".to_string(),
            "1".to_string(),
            "--".to_string(),
            "https://example.com/r.git".to_string(),
            target.to_string_lossy().to_string(),
        ]
    );
}

#[tokio::test]
async fn test_clone_missing_fields() {
    let t = TestApp::new();

    for body in [
        json!({}),
        json!({ "repoUrl": "https://example.com/r.git" }),
        json!({ "projectId": "p1" }),
        json!({ "repoUrl": "", "projectId": "p1" }),
    ] {
        let (status, body) = t.post("/clone", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing required fields: repoUrl, projectId" }));
    }

    assert_eq!(t.runner.call_count(), 0);
}

#[tokio::test]
async fn test_clone_failure_returns_details() {
    let t = TestApp::with_runner(RecordingRunner::failing(CommandFailure {
        error: "Command failed (exit code 128): git clone".to_string(),
        stderr: "fatal: repository 'x' not found\n".to_string(),
        stdout: "Cloning into '/workspace/p1'...\n".to_string(),
    }));

    let (status, body) = t
        .post("/clone", json!({ "repoUrl": "x", "projectId": "p1" }))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "error": "Failed to clone repository",
            "details": {
                "error": "Command failed (exit code 128): git clone",
                "stderr": "fatal: repository 'x' not found\n",
                "stdout": "Cloning into '/workspace/p1'...\n",
            }
        })
    );
}

#[tokio::test]
async fn test_clone_replaces_existing_project() {
    let t = TestApp::with_runner(RecordingRunner::new().with_clone_files([("new.txt", "v2")]));
    let dir = t.make_project("p1", true);
    std::fs::write(dir.join("old.txt"), "v1").unwrap();

    let (status, _) = t
        .post("/clone", json!({ "repoUrl": "repo", "projectId": "p1" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    let entries: Vec<_> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(entries, vec!["new.txt"]);
}

#[tokio::test]
async fn test_test_endpoint() {
    let t = TestApp::with_runner(RecordingRunner::new().with_output("3 passed\n", "WARNING: x\n"));
    let dir = t.make_project("p1", false);

    let (status, body) = t
        .post(
            "/test",
            json!({ "projectId": "p1", "testCommandArgs": ["--script", "res://t.gd"] }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "Tests executed successfully",
            "output": { "stdout": "3 passed\n", "stderr": "WARNING: x\n" }
        })
    );

    let calls = t.runner.calls();
    assert_eq!(calls[0].program, "godot");
    assert_eq!(
        calls[0].args,
        vec![
            "--headless",
            "--rendering-driver",
            "opengl3",
            "--script",
            "res://t.gd",
            "--quit"
        ]
    );
    assert_eq!(calls[0].working_dir.as_deref(), Some(dir.as_path()));
}

#[tokio::test]
async fn test_test_endpoint_invalid_args() {
    let t = TestApp::new();
    t.make_project("p1", false);

    for body in [
        json!({ "projectId": "p1" }),
        json!({ "projectId": "p1", "testCommandArgs": [] }),
        json!({ "projectId": "p1", "testCommandArgs": "--script t.gd" }),
    ] {
        let (status, body) = t.post("/test", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing or invalid testCommandArgs array" }));
    }

    let (status, body) = t.post("/test", json!({ "testCommandArgs": ["-s"] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing required field: projectId" }));

    assert_eq!(t.runner.call_count(), 0);
}

#[tokio::test]
async fn test_test_endpoint_without_marker() {
    let t = TestApp::new();
    std::fs::create_dir_all(t.project_dir("p1")).unwrap();

    let (status, body) = t
        .post("/test", json!({ "projectId": "p1", "testCommandArgs": ["-s", "t.gd"] }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        format!("Project not found or invalid at {}", t.project_dir("p1").display())
    );
    assert_eq!(t.runner.call_count(), 0);
}

#[tokio::test]
async fn test_test_failure_returns_details() {
    let t = TestApp::with_runner(RecordingRunner::failing(CommandFailure {
        error: "Command failed (exit code 1): godot".to_string(),
        stderr: "SCRIPT ERROR".to_string(),
        stdout: "1 failed".to_string(),
    }));
    t.make_project("p1", false);

    let (status, body) = t
        .post("/test", json!({ "projectId": "p1", "testCommandArgs": ["-s", "t.gd"] }))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to execute tests");
    assert_eq!(body["details"]["stderr"], "SCRIPT ERROR");
    assert_eq!(body["details"]["stdout"], "1 failed");
}

#[tokio::test]
async fn test_build_endpoint() {
    let t = TestApp::new();
    let dir = t.make_project("p1", true);

    let (status, body) = t
        .post(
            "/build",
            json!({ "projectId": "p1", "exportPreset": "Linux/X11", "outputName": "game" }),
        )
        .await;

    let output_path = dir.join("build").join("game");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!(
            "Build successful for preset \"Linux/X11\". Output at: {}",
            output_path.display()
        )
    );
    assert_eq!(body["output"]["stdout"], "ok\n");
    assert!(dir.join("build").is_dir());

    let calls = t.runner.calls();
    assert_eq!(
        calls[0].args,
        vec![
            "--headless".to_string(),
            "--rendering-driver".to_string(),
            "opengl3".to_string(),
            "--export-release".to_string(),
            "Linux/X11".to_string(),
            output_path.to_string_lossy().to_string(),
            "--quit".to_string(),
        ]
    );
    assert_eq!(calls[0].working_dir.as_deref(), Some(dir.as_path()));
}

#[tokio::test]
async fn test_build_missing_fields() {
    let t = TestApp::new();
    t.make_project("p1", true);

    let (status, body) = t
        .post("/build", json!({ "projectId": "p1", "exportPreset": "Web" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "Missing required fields: projectId, exportPreset, outputName" })
    );
    assert_eq!(t.runner.call_count(), 0);
}

#[tokio::test]
async fn test_build_without_marker() {
    let t = TestApp::new();

    let (status, _) = t
        .post(
            "/build",
            json!({ "projectId": "ghost", "exportPreset": "Web", "outputName": "index" }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(t.runner.call_count(), 0);
}

#[tokio::test]
async fn test_build_without_export_presets() {
    let t = TestApp::new();
    let dir = t.make_project("p1", false);

    let (status, body) = t
        .post(
            "/build",
            json!({ "projectId": "p1", "exportPreset": "Web", "outputName": "index" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        format!("export_presets.cfg not found in project root: {}", dir.display())
    );
    assert!(!dir.join("build").exists());
    assert_eq!(t.runner.call_count(), 0);
}

#[tokio::test]
async fn test_build_escaping_build_dir_rejected() {
    let t = TestApp::new();
    t.make_project("p1", true);

    let (status, _) = t
        .post(
            "/build",
            json!({
                "projectId": "p1",
                "exportPreset": "Web",
                "outputName": "index",
                "buildDir": "../../elsewhere"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(t.runner.call_count(), 0);
}

#[tokio::test]
async fn test_cleanup_twice() {
    let t = TestApp::new();
    let dir = t.make_project("p1", true);

    let (status, body) = t.post("/cleanup", json!({ "projectId": "p1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Successfully cleaned up project: p1" }));
    assert!(!dir.exists());

    let (status, body) = t.post("/cleanup", json!({ "projectId": "p1" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["error"],
        format!("Project directory not found: {}", dir.display())
    );
}

#[tokio::test]
async fn test_cleanup_missing_project_id() {
    let t = TestApp::new();

    let (status, body) = t.post("/cleanup", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing required field: projectId" }));
}

#[tokio::test]
async fn test_full_lifecycle() {
    let t = TestApp::with_runner(RecordingRunner::new().with_clone_files([
        ("project.godot", "config_version=5\n"),
        ("export_presets.cfg", "[preset.0]\n"),
    ]));

    let (status, _) = t
        .post("/clone", json!({ "repoUrl": "repo", "branch": "main", "projectId": "game" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = t
        .post("/test", json!({ "projectId": "game", "testCommandArgs": ["-s", "t.gd"] }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = t
        .post(
            "/build",
            json!({ "projectId": "game", "exportPreset": "Web", "outputName": "index", "buildDir": "build/web" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(t.project_dir("game").join("build/web").is_dir());

    let (status, _) = t.post("/cleanup", json!({ "projectId": "game" })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!t.project_dir("game").exists());

    assert_eq!(t.runner.call_count(), 3);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let t = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/clone")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = t.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(t.runner.call_count(), 0);
}

#[tokio::test]
async fn test_missing_content_type_is_bad_request() {
    let t = TestApp::new();

    let request = Request::builder()
        .method("POST")
        .uri("/cleanup")
        .body(Body::from(r#"{"projectId":"p1"}"#))
        .unwrap();
    let (status, _) = t.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_endpoints() {
    let t = TestApp::new();

    let (status, body) = t.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = t.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_ready_fails_without_workspace() {
    let t = TestApp::new();
    std::fs::remove_dir_all(t.root.path()).unwrap();

    let (status, body) = t.get("/health/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");
}
