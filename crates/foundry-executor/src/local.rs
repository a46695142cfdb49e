//! Local process runner using `tokio::process`.

use async_trait::async_trait;
use foundry_core::command::{CommandFailure, CommandOutput, CommandRunner, CommandSpec};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

/// Runs commands as direct children of the gateway process.
///
/// Children are killed when the future running them is dropped, so an
/// abandoned request or an expired timeout never leaves a tool behind.
#[derive(Debug, Default, Clone)]
pub struct LocalProcessRunner;

impl LocalProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for LocalProcessRunner {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, CommandFailure> {
        info!(
            command = %spec.command_line(),
            cwd = ?spec.working_dir,
            "Executing command"
        );

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &spec.working_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|e| {
            error!(program = %spec.program, error = %e, "Failed to spawn command");
            CommandFailure::spawn(&spec, &e)
        })?;

        let waited = match spec.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(waited) => waited,
                Err(_) => {
                    error!(
                        command = %spec.command_line(),
                        timeout_secs = limit.as_secs(),
                        "Command timed out, killed"
                    );
                    return Err(CommandFailure::timed_out(&spec, limit));
                }
            },
            None => child.wait_with_output().await,
        };

        let output = waited.map_err(|e| {
            error!(program = %spec.program, error = %e, "Failed to collect command output");
            CommandFailure::message(format!("failed to wait for {}: {}", spec.program, e))
        })?;

        let captured = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if !output.status.success() {
            error!(
                command = %spec.command_line(),
                code = ?output.status.code(),
                stderr = %captured.stderr,
                "Command failed"
            );
            return Err(CommandFailure::exited(&spec, output.status.code(), captured));
        }

        debug!(stdout = %captured.stdout, "Command stdout");
        if !captured.stderr.is_empty() {
            warn!(stderr = %captured.stderr, "Command succeeded with stderr output");
        }

        Ok(captured)
    }
}
