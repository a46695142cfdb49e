//! A runner that records invocations instead of running real tools.

use async_trait::async_trait;
use foundry_core::command::{CommandFailure, CommandOutput, CommandRunner, CommandSpec};
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Records every [`CommandSpec`] it is asked to run.
///
/// A `git clone` invocation is simulated by creating the target directory
/// (the last argument) and writing the configured files into it.
pub struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    output: CommandOutput,
    failure: Option<CommandFailure>,
    clone_files: Vec<(String, String)>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRunner {
    /// Succeeds every command; a simulated clone writes a `project.godot`.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            output: CommandOutput {
                stdout: "ok\n".to_string(),
                stderr: String::new(),
            },
            failure: None,
            clone_files: vec![("project.godot".to_string(), "config_version=5\n".to_string())],
            delay: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Fails every command with `failure`.
    pub fn failing(failure: CommandFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::new()
        }
    }

    pub fn with_output(mut self, stdout: &str, stderr: &str) -> Self {
        self.output = CommandOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        };
        self
    }

    /// Files a simulated clone leaves in the target directory.
    pub fn with_clone_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        self.clone_files = files
            .into_iter()
            .map(|(name, content)| (name.into(), content.into()))
            .collect();
        self
    }

    /// Hold each command open for `delay` before completing it.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Highest number of commands observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn simulate_clone(&self, spec: &CommandSpec) -> Result<(), CommandFailure> {
        let Some(target) = spec.args.last().map(PathBuf::from) else {
            return Ok(());
        };
        if target.exists() {
            return Err(CommandFailure::message(format!(
                "fatal: destination path '{}' already exists and is not an empty directory.",
                target.display()
            )));
        }
        std::fs::create_dir_all(&target).map_err(|e| CommandFailure::message(e.to_string()))?;
        for (name, content) in &self.clone_files {
            std::fs::write(target.join(name), content)
                .map_err(|e| CommandFailure::message(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, CommandFailure> {
        self.calls.lock().unwrap().push(spec.clone());

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let result = match &self.failure {
            Some(failure) => Err(failure.clone()),
            None if spec.args.first().map(String::as_str) == Some("clone") => {
                self.simulate_clone(&spec).map(|_| self.output.clone())
            }
            None => Ok(self.output.clone()),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
