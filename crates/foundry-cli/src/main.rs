//! Foundry CLI tool.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "foundry")]
#[command(about = "Foundry workspace gateway CLI", long_about = None)]
struct Cli {
    /// Gateway server URL
    #[arg(long, env = "FOUNDRY_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone a repository into a fresh project workspace
    Clone {
        /// Repository URL
        repo_url: String,
        /// Project identifier
        project_id: String,
        /// Branch to clone
        #[arg(long)]
        branch: Option<String>,
    },
    /// Run the engine headlessly with test arguments
    Test {
        /// Project identifier
        project_id: String,
        /// Arguments passed to the engine, e.g. `-- --script res://test/run.gd`
        #[arg(required = true, last = true)]
        args: Vec<String>,
    },
    /// Export a release build
    Build {
        /// Project identifier
        project_id: String,
        /// Export preset name
        preset: String,
        /// Output file name, without extension
        output_name: String,
        /// Build directory relative to the project root
        #[arg(long)]
        build_dir: Option<String>,
    },
    /// Remove a project workspace
    Cleanup {
        /// Project identifier
        project_id: String,
    },
    /// Check gateway health and readiness
    Health,
    /// Validate a gateway configuration file
    Validate {
        /// Path to the configuration file
        #[arg(default_value = "foundry.kdl")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clone {
            repo_url,
            project_id,
            branch,
        } => {
            commands::projects::clone(&cli.api_url, &repo_url, &project_id, branch).await?;
        }
        Commands::Test { project_id, args } => {
            commands::projects::test(&cli.api_url, &project_id, args).await?;
        }
        Commands::Build {
            project_id,
            preset,
            output_name,
            build_dir,
        } => {
            commands::projects::build(&cli.api_url, &project_id, &preset, &output_name, build_dir)
                .await?;
        }
        Commands::Cleanup { project_id } => {
            commands::projects::cleanup(&cli.api_url, &project_id).await?;
        }
        Commands::Health => {
            commands::health(&cli.api_url).await?;
        }
        Commands::Validate { path } => {
            commands::validate(&path)?;
        }
    }

    Ok(())
}
