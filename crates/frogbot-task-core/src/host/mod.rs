//! Capability interface over the pipeline host.
//!
//! Every component receives a `&dyn TaskHost` explicitly; nothing reaches
//! for global task state. `ProcessHost` talks to the real environment,
//! `MemoryHost` scripts everything for tests, and `DryRunHost` wraps another
//! host so commands are recorded instead of spawned.

pub mod dry_run;
pub mod memory;
pub mod process;

pub use self::dry_run::DryRunHost;
pub use self::memory::{LogLevel, MemoryHost};
pub use self::process::ProcessHost;

use crate::secrets;
use async_trait::async_trait;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by host primitives.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("integration '{0}' not found")]
    IntegrationNotFound(String),

    #[error("command `{command}` exited with {}: {}", .status.map_or("signal".to_string(), |s| format!("status {s}")), .stderr.trim())]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot export '{0}': {1}")]
    Export(String, String),
}

impl HostError {
    /// Mask the given secrets in any captured command output.
    pub fn scrub(self, masked: &[&str]) -> Self {
        match self {
            HostError::CommandFailed {
                command,
                status,
                stdout,
                stderr,
            } => HostError::CommandFailed {
                command,
                status,
                stdout: secrets::scrub(&stdout, masked),
                stderr: secrets::scrub(&stderr, masked),
            },
            other => other,
        }
    }

    /// Standard output captured before a command failed.
    pub fn stdout(&self) -> Option<&str> {
        match self {
            HostError::CommandFailed { stdout, .. } if !stdout.trim().is_empty() => {
                Some(stdout.trim_end())
            }
            _ => None,
        }
    }
}

/// Captured output of a finished shell command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// A host-managed named credential bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Integration {
    pub name: String,
    pub values: BTreeMap<String, String>,
}

impl Integration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Field value, or `""` when the integration has no such field.
    pub fn get_value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }
}

/// The pipeline host API the task is written against.
#[async_trait]
pub trait TaskHost: Send + Sync {
    /// Raw task input; unset inputs read as `""`.
    fn get_input(&self, name: &str) -> String;

    /// Pipeline variable; unset variables read as `""`.
    fn get_variable(&self, name: &str) -> String;

    fn export_environment_variable(&self, name: &str, value: &str) -> Result<(), HostError>;

    fn get_integration(&self, name: &str) -> Result<Integration, HostError>;

    fn operating_system_family(&self) -> String;

    /// Run a shell command to completion. Non-zero exit is an error.
    async fn execute(&self, command: &str) -> Result<ExecOutput, HostError>;

    fn info(&self, msg: &str);

    fn debug(&self, msg: &str);

    fn warn(&self, msg: &str);

    fn error(&self, msg: &str);
}
