use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Puzzle part selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Part {
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

impl Part {
    pub const ALL: [Part; 2] = [Part::One, Part::Two];

    pub fn number(self) -> u8 {
        match self {
            Part::One => 1,
            Part::Two => 2,
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for Part {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(Part::One),
            "2" => Ok(Part::Two),
            other => Err(HarnessError::Config(format!(
                "part {other} is not supported (expected 1 or 2)"
            ))),
        }
    }
}

/// Expand an optional part selector: `None` means both parts.
pub fn resolve_parts(part: Option<Part>) -> Vec<Part> {
    match part {
        Some(part) => vec![part],
        None => Part::ALL.to_vec(),
    }
}

/// Role a fixture file plays within a fixture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureRole {
    In,
    Out,
}

impl fmt::Display for FixtureRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureRole::In => f.write_str("in"),
            FixtureRole::Out => f.write_str("out"),
        }
    }
}

fn join_parts(parts: &[Part]) -> String {
    parts
        .iter()
        .map(Part::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Custom error types for puzzlebox
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("unknown language backend: {0}")]
    UnknownBackend(String),

    #[error("build failed ({}): {command}\n{output}", describe_exit(.exit_code))]
    BuildFailed {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },

    #[error("solver failed ({}): {command}\n{output}", describe_exit(.exit_code))]
    ProcessFailed {
        command: String,
        exit_code: Option<i32>,
        output: String,
    },

    #[error("solver exited successfully without printing a solution for part(s) {}: {command}", join_parts(.missing))]
    MissingSolutionOutput { command: String, missing: Vec<Part> },

    #[error("output drain timed out after {grace:?} with part(s) {} still missing: {command}", join_parts(.missing))]
    DrainTimeout {
        command: String,
        grace: Duration,
        missing: Vec<Part>,
    },

    #[error("fixture {index} (part {part}) has no `{role}` file")]
    FixtureIncomplete {
        index: u64,
        part: Part,
        role: FixtureRole,
    },

    #[error("fixture file {} does not exist", .0.display())]
    FixtureFileMissing(PathBuf),

    #[error("expected-output file {} is empty", .0.display())]
    FixtureEmpty(PathBuf),

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl From<nix::errno::Errno> for HarnessError {
    fn from(err: nix::errno::Errno) -> Self {
        HarnessError::Io(std::io::Error::from(err))
    }
}

/// Result type alias for puzzlebox operations
pub type Result<T> = std::result::Result<T, HarnessError>;
