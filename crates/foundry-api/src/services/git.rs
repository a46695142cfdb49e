//! Git service for cloning repositories into project directories.

use foundry_core::CommandSpec;
use std::path::Path;
use std::time::Duration;

/// Builds version-control invocations.
#[derive(Debug, Clone)]
pub struct GitService {
    /// Path to git binary
    git_bin: String,
    timeout: Option<Duration>,
}

impl GitService {
    pub fn new(git_bin: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            git_bin: git_bin.into(),
            timeout,
        }
    }

    /// Shallow clone of `repo_url`, optionally pinned to `branch`, directly into `target`.
    pub fn clone_spec(&self, repo_url: &str, branch: Option<&str>, target: &Path) -> CommandSpec {
        let mut spec = CommandSpec::new(&self.git_bin).args(["clone", "--depth", "1"]);

        if let Some(branch) = branch {
            spec = spec.args(["--branch", branch]);
        }

        // `--` keeps a URL that starts with a dash from being read as an option
        spec.arg("--")
            .arg(repo_url)
            .arg(target.to_string_lossy())
            .timeout(self.timeout)
    }
}
