//! CLI command implementations.

pub mod projects;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Thin JSON client for the gateway endpoints.
pub struct ApiClient {
    base: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(api_url: &str) -> Result<Self> {
        Ok(Self {
            base: base_url(api_url)?,
            http: reqwest::Client::new(),
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("Invalid endpoint path: {}", path))
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let response = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to reach gateway at {}", url))?;
        finish(path, response).await
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to reach gateway at {}", url))?;
        finish(path, response).await
    }
}

/// Parse the gateway URL so endpoint paths join beneath it.
fn base_url(api_url: &str) -> Result<Url> {
    let mut base =
        Url::parse(api_url).with_context(|| format!("Invalid API URL: {}", api_url))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

async fn finish(path: &str, response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(body);
    }

    if let Some(details) = body.get("details") {
        print_output(details);
        if let Some(error) = details.get("error").and_then(Value::as_str) {
            eprintln!("{}", error);
        }
    }
    let message = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("no error message");
    bail!("{} failed ({}): {}", path, status, message)
}

/// Echo captured process output the way the tool printed it.
pub fn print_output(output: &Value) {
    if let Some(stdout) = output.get("stdout").and_then(Value::as_str) {
        print!("{}", stdout);
    }
    if let Some(stderr) = output.get("stderr").and_then(Value::as_str) {
        eprint!("{}", stderr);
    }
}

pub async fn health(api_url: &str) -> Result<()> {
    let client = ApiClient::new(api_url)?;
    let health = client.get("/health").await?;
    println!("health: {}", health["status"].as_str().unwrap_or("unknown"));
    let ready = client.get("/health/ready").await?;
    println!(
        "ready: {} (workspace {})",
        ready["status"].as_str().unwrap_or("unknown"),
        ready["workspace"].as_str().unwrap_or("?")
    );
    Ok(())
}

pub fn validate(path: &str) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path))?;
    match foundry_config::parse_gateway_config(&content) {
        Ok(config) => {
            println!("Configuration is valid");
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}
