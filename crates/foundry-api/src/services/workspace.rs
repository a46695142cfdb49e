//! Workspace gateway: provision, test, build and reclaim project directories.
//!
//! Each operation:
//! 1. Validates the request (no side effects on failure)
//! 2. Takes the project's lock, when project serialization is enabled
//! 3. Checks the project's files on disk
//! 4. Runs exactly one external command rooted at the project directory

use foundry_config::GatewayConfig;
use foundry_core::project::{EXPORT_PRESETS, PROJECT_MARKER};
use foundry_core::{
    BuildDir, CommandOutput, CommandRunner, Error, ProjectId, Result, is_plain_name,
};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::services::git::GitService;
use crate::services::godot::GodotService;
use crate::services::locks::{ProjectGuard, ProjectLocks};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneRequest {
    pub repo_url: Option<String>,
    pub branch: Option<String>,
    pub project_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRequest {
    pub project_id: Option<String>,
    /// Anything other than an array of strings reads as absent.
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub test_command_args: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    pub project_id: Option<String>,
    pub export_preset: Option<String>,
    pub output_name: Option<String>,
    pub build_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupRequest {
    pub project_id: Option<String>,
}

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub preset: String,
    pub output_path: PathBuf,
    pub output: CommandOutput,
}

impl BuildOutcome {
    pub fn message(&self) -> String {
        format!(
            "Build successful for preset \"{}\". Output at: {}",
            self.preset,
            self.output_path.display()
        )
    }
}

/// Owns the workspace root and every process run against it.
pub struct WorkspaceGateway {
    root: PathBuf,
    git: GitService,
    godot: GodotService,
    runner: Arc<dyn CommandRunner>,
    locks: Option<ProjectLocks>,
}

impl WorkspaceGateway {
    pub fn new(config: &GatewayConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            root: config.workspace_root.clone(),
            git: GitService::new(&config.tools.git, config.process_timeout),
            godot: GodotService::new(
                &config.tools.godot,
                &config.tools.rendering_driver,
                config.process_timeout,
            ),
            runner,
            locks: config.serialize_projects.then(ProjectLocks::new),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Replace the project directory with a fresh shallow clone.
    pub async fn provision(&self, req: CloneRequest) -> Result<String> {
        let (Some(repo_url), Some(project_id)) = (present(req.repo_url), present(req.project_id))
        else {
            return Err(Error::InvalidInput(
                "Missing required fields: repoUrl, projectId".to_string(),
            ));
        };
        let id = ProjectId::parse(&project_id)?;
        let branch = present(req.branch);
        let project_dir = id.dir_in(&self.root);

        let _guard = self.lock(&id).await;

        info!(project = %id, path = %project_dir.display(), "Cleaning up existing directory (if any)");
        remove_dir_if_exists(&project_dir).await?;

        let spec = self.git.clone_spec(&repo_url, branch.as_deref(), &project_dir);
        self.runner.run(spec).await?;

        info!(project = %id, repo = %repo_url, branch = ?branch, "Repository cloned");
        Ok(format!(
            "Repository {} cloned successfully into {}",
            repo_url,
            project_dir.display()
        ))
    }

    /// Run the engine headlessly with the caller's test arguments.
    pub async fn run_tests(&self, req: TestRequest) -> Result<CommandOutput> {
        let project_id = present(req.project_id)
            .ok_or_else(|| Error::InvalidInput("Missing required field: projectId".to_string()))?;
        let test_args = req
            .test_command_args
            .filter(|args| !args.is_empty())
            .ok_or_else(|| {
                Error::InvalidInput("Missing or invalid testCommandArgs array".to_string())
            })?;
        let id = ProjectId::parse(&project_id)?;
        let project_dir = id.dir_in(&self.root);

        let _guard = self.lock(&id).await;
        require_project(&project_dir).await?;

        let output = self
            .runner
            .run(self.godot.test_spec(&project_dir, &test_args))
            .await?;

        info!(project = %id, "Tests executed");
        Ok(output)
    }

    /// Export a release build of the project with the named preset.
    pub async fn build(&self, req: BuildRequest) -> Result<BuildOutcome> {
        let (Some(project_id), Some(preset), Some(output_name)) = (
            present(req.project_id),
            present(req.export_preset),
            present(req.output_name),
        ) else {
            return Err(Error::InvalidInput(
                "Missing required fields: projectId, exportPreset, outputName".to_string(),
            ));
        };
        let id = ProjectId::parse(&project_id)?;
        let build_dir = BuildDir::parse(req.build_dir.as_deref())?;
        if !is_plain_name(&output_name) {
            return Err(Error::InvalidInput(format!(
                "Invalid outputName '{}': must be a file name without directories",
                output_name
            )));
        }

        let project_dir = id.dir_in(&self.root);
        let absolute_build_dir = project_dir.join(build_dir.as_path());
        let output_path = absolute_build_dir.join(&output_name);

        let _guard = self.lock(&id).await;
        require_project(&project_dir).await?;
        if !file_exists(&project_dir.join(EXPORT_PRESETS)).await {
            return Err(Error::InvalidInput(format!(
                "{} not found in project root: {}",
                EXPORT_PRESETS,
                project_dir.display()
            )));
        }

        info!(path = %absolute_build_dir.display(), "Ensuring build directory exists");
        tokio::fs::create_dir_all(&absolute_build_dir)
            .await
            .map_err(|e| Error::filesystem("create", &absolute_build_dir, e))?;

        let output = self
            .runner
            .run(self.godot.export_spec(&project_dir, &preset, &output_path))
            .await?;

        info!(project = %id, preset = %preset, output = %output_path.display(), "Build exported");
        Ok(BuildOutcome {
            preset,
            output_path,
            output,
        })
    }

    /// Delete the project directory and everything in it.
    pub async fn reclaim(&self, req: CleanupRequest) -> Result<String> {
        let project_id = present(req.project_id)
            .ok_or_else(|| Error::InvalidInput("Missing required field: projectId".to_string()))?;
        let id = ProjectId::parse(&project_id)?;
        let project_dir = id.dir_in(&self.root);

        let _guard = self.lock(&id).await;
        if !file_exists(&project_dir).await {
            return Err(Error::NotFound(format!(
                "Project directory not found: {}",
                project_dir.display()
            )));
        }

        info!(project = %id, path = %project_dir.display(), "Removing project directory");
        tokio::fs::remove_dir_all(&project_dir)
            .await
            .map_err(|e| Error::filesystem("remove", &project_dir, e))?;

        Ok(format!("Successfully cleaned up project: {}", id))
    }

    async fn lock(&self, id: &ProjectId) -> Option<ProjectGuard> {
        match &self.locks {
            Some(locks) => Some(locks.acquire(id).await),
            None => None,
        }
    }
}

/// Required string fields treat `""` the same as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn file_exists(path: &Path) -> bool {
    matches!(tokio::fs::try_exists(path).await, Ok(true))
}

async fn require_project(project_dir: &Path) -> Result<()> {
    if file_exists(&project_dir.join(PROJECT_MARKER)).await {
        Ok(())
    } else {
        warn!(path = %project_dir.display(), "No project marker found");
        Err(Error::NotFound(format!(
            "Project not found or invalid at {}",
            project_dir.display()
        )))
    }
}

async fn remove_dir_if_exists(path: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::filesystem("remove", path, e)),
    }
}

fn lenient_string_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
