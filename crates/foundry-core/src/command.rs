//! External command invocation.
//!
//! Every operation the gateway performs is a single external process run
//! through a [`CommandRunner`]. Arguments always travel as a vector; no
//! value is ever interpreted by a shell.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// One external process invocation: program, argv, working directory and timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to execute, resolved through `PATH` when not absolute.
    pub program: String,
    /// Arguments, one element per argv slot.
    pub args: Vec<String>,
    /// Working directory for the child process.
    pub working_dir: Option<PathBuf>,
    /// Maximum wall-clock time before the child is killed.
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Human-readable command line, for logs and error messages only.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|part| {
                if part.is_empty() || part.contains(char::is_whitespace) {
                    format!("\"{}\"", part)
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured output of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Why a run failed, with whatever output was captured before it did.
///
/// Serialized verbatim as the `details` of an execution error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{error}")]
pub struct CommandFailure {
    pub error: String,
    pub stderr: String,
    pub stdout: String,
}

impl CommandFailure {
    /// The process could not be started at all.
    pub fn spawn(spec: &CommandSpec, err: &std::io::Error) -> Self {
        Self {
            error: format!("failed to spawn {}: {}", spec.program, err),
            stderr: String::new(),
            stdout: String::new(),
        }
    }

    /// The process ran and exited unsuccessfully.
    pub fn exited(spec: &CommandSpec, code: Option<i32>, output: CommandOutput) -> Self {
        let status = match code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };
        Self {
            error: format!("Command failed ({}): {}", status, spec.command_line()),
            stderr: output.stderr,
            stdout: output.stdout,
        }
    }

    /// The process outlived its timeout and was killed.
    pub fn timed_out(spec: &CommandSpec, after: Duration) -> Self {
        Self {
            error: format!(
                "Command timed out after {}s: {}",
                after.as_secs(),
                spec.command_line()
            ),
            stderr: String::new(),
            stdout: String::new(),
        }
    }

    /// A filesystem step failed; there is no process output to report.
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            stderr: String::new(),
            stdout: String::new(),
        }
    }
}

/// Runs external commands and captures their output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Name of this runner.
    fn name(&self) -> &'static str;

    /// Run the command to completion.
    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, CommandFailure>;
}
