//! Engine service for headless test runs and release exports.

use foundry_core::CommandSpec;
use std::path::Path;
use std::time::Duration;

/// Builds engine invocations rooted at a project directory.
#[derive(Debug, Clone)]
pub struct GodotService {
    godot_bin: String,
    rendering_driver: String,
    timeout: Option<Duration>,
}

impl GodotService {
    pub fn new(
        godot_bin: impl Into<String>,
        rendering_driver: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            godot_bin: godot_bin.into(),
            rendering_driver: rendering_driver.into(),
            timeout,
        }
    }

    /// Headless invocation with the forced rendering driver, run inside the project.
    fn headless(&self, project_dir: &Path) -> CommandSpec {
        CommandSpec::new(&self.godot_bin)
            .args(["--headless", "--rendering-driver", self.rendering_driver.as_str()])
            .current_dir(project_dir)
            .timeout(self.timeout)
    }

    /// Run the caller's test arguments, then quit.
    pub fn test_spec(&self, project_dir: &Path, test_args: &[String]) -> CommandSpec {
        self.headless(project_dir)
            .args(test_args.iter().cloned())
            .arg("--quit")
    }

    /// Export `preset` as a release build to `output_path`, then quit.
    pub fn export_spec(&self, project_dir: &Path, preset: &str, output_path: &Path) -> CommandSpec {
        self.headless(project_dir)
            .arg("--export-release")
            .arg(preset)
            .arg(output_path.to_string_lossy())
            .arg("--quit")
    }
}
