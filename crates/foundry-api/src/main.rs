//! Foundry workspace gateway server.

use anyhow::Context;
use clap::Parser;
use foundry_api::{AppState, routes};
use foundry_config::GatewayConfig;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "foundry-server")]
#[command(about = "HTTP gateway for cloning, testing and exporting engine projects", long_about = None)]
struct Args {
    /// Path to a KDL configuration file
    #[arg(long, env = "FOUNDRY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("FOUNDRY_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = GatewayConfig::load(args.config.as_deref()).with_context(|| match &args.config {
        Some(path) => format!("Failed to load config file: {}", path.display()),
        None => "Failed to load configuration from environment".to_string(),
    })?;

    let addr = config.listen_addr();
    let workspace = config.workspace_root.clone();
    if !workspace.is_dir() {
        warn!(
            workspace = %workspace.display(),
            "Workspace directory does not exist! It should be created before the server starts"
        );
    }

    // Build router
    let app = routes::router(AppState::new(config))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start server
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, workspace = %workspace.display(), "Foundry gateway listening");

    axum::serve(listener, app).await?;

    Ok(())
}
