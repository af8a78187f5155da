use crate::config::types::{Part, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

/// One fully templated command: argv, working directory, environment overlay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub argv: Vec<String>,
    pub cwd: PathBuf,
    /// Merged over the inherited environment; overlay wins on conflict.
    pub environment: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(argv: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            argv,
            cwd: cwd.into(),
            environment: Vec::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.push((key.into(), value.into()));
        self
    }

    /// Copy of this command with extra trailing arguments.
    pub fn with_args<I, S>(&self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = self.clone();
        spec.argv.extend(args.into_iter().map(Into::into));
        spec
    }

    /// Build a `std::process::Command` with cwd and environment overlay applied.
    pub fn to_command(&self) -> Result<Command> {
        let (program, args) = self.argv.split_first().ok_or_else(|| {
            crate::config::types::HarnessError::Config("empty command".to_string())
        })?;
        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(&self.cwd)
            .envs(self.environment.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        Ok(command)
    }
}

fn quote(arg: &str) -> String {
    if !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:+,@%".contains(c))
    {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

impl fmt::Display for CommandSpec {
    /// Shell-pastable rendering used in logs and failure reports.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.argv.iter().map(|a| quote(a)).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

/// Result of resolving a backend for one entrypoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedBackend {
    pub backend_id: String,
    pub entrypoint: PathBuf,
    pub build: Option<CommandSpec>,
    pub run: CommandSpec,
}

impl ResolvedBackend {
    /// Run command for one input file and part selection.
    ///
    /// The child receives `-i <input>` and, when a single part is requested,
    /// `-p <part>`.
    pub fn run_command_for(&self, input: &std::path::Path, part: Option<Part>) -> CommandSpec {
        let mut args = vec!["-i".to_string(), input.display().to_string()];
        if let Some(part) = part {
            args.push("-p".to_string());
            args.push(part.to_string());
        }
        self.run.with_args(args)
    }
}

/// A structured `Part <n> solution: <answer>` line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResult {
    pub part: Part,
    pub answer: String,
}

/// Parsed results in order of first appearance, or the invocation's failure.
pub type InvocationOutcome = Result<Vec<ParsedResult>>;

/// Orchestrator tuning knobs.
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Post-exit window granted to drain buffered output.
    pub grace_window: Duration,
    /// Readiness wait bound while the child is still running.
    pub poll_interval: Duration,
    /// Number of trailing output lines kept for failure reports.
    pub tail_lines: usize,
    /// Echo child output to our own stdout.
    pub echo: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            grace_window: Duration::from_secs(2),
            poll_interval: Duration::from_millis(50),
            tail_lines: 64,
            echo: true,
        }
    }
}
