//! Project workspace commands.

use anyhow::Result;
use serde_json::{Value, json};

use super::{ApiClient, print_output};

pub async fn clone(
    api_url: &str,
    repo_url: &str,
    project_id: &str,
    branch: Option<String>,
) -> Result<()> {
    let client = ApiClient::new(api_url)?;
    let mut body = json!({ "repoUrl": repo_url, "projectId": project_id });
    if let Some(branch) = branch {
        body["branch"] = Value::String(branch);
    }

    let response = client.post("/clone", &body).await?;
    print_message(&response);
    Ok(())
}

pub async fn test(api_url: &str, project_id: &str, args: Vec<String>) -> Result<()> {
    let client = ApiClient::new(api_url)?;
    let response = client
        .post(
            "/test",
            &json!({ "projectId": project_id, "testCommandArgs": args }),
        )
        .await?;

    print_output(&response["output"]);
    print_message(&response);
    Ok(())
}

pub async fn build(
    api_url: &str,
    project_id: &str,
    preset: &str,
    output_name: &str,
    build_dir: Option<String>,
) -> Result<()> {
    let client = ApiClient::new(api_url)?;
    let mut body = json!({
        "projectId": project_id,
        "exportPreset": preset,
        "outputName": output_name,
    });
    if let Some(build_dir) = build_dir {
        body["buildDir"] = Value::String(build_dir);
    }

    let response = client.post("/build", &body).await?;
    print_output(&response["output"]);
    print_message(&response);
    Ok(())
}

pub async fn cleanup(api_url: &str, project_id: &str) -> Result<()> {
    let client = ApiClient::new(api_url)?;
    let response = client
        .post("/cleanup", &json!({ "projectId": project_id }))
        .await?;
    print_message(&response);
    Ok(())
}

fn print_message(response: &Value) {
    if let Some(message) = response.get("message").and_then(Value::as_str) {
        println!("{}", message);
    }
}
