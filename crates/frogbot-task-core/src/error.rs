use crate::host::HostError;
use thiserror::Error;

/// Failures surfaced to the task orchestrator. None of them are retried.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A mandatory task input was empty.
    #[error("Mandatory inputs are missing. Please verify frogbot task inputs: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    /// The host could not find the named integration.
    #[error("failed to fetch integration '{integration}'")]
    IntegrationLookup {
        integration: String,
        #[source]
        source: HostError,
    },

    /// The integration exists but the requested field is empty.
    #[error("unable to find token '{field}' in integration '{integration}', please check input token provided")]
    MissingSecret { integration: String, field: String },

    /// Exporting a variable into the host session failed.
    #[error("failed to export environment variable {key}")]
    Publish {
        key: String,
        #[source]
        source: HostError,
    },

    /// Fetching the frogbot binary failed.
    #[error("failed to download frogbot")]
    Download(#[source] HostError),

    /// Running the frogbot binary failed.
    #[error("failed to run frogbot")]
    Execution(#[source] HostError),
}

impl TaskError {
    /// Name of the task step that produced this error.
    pub fn stage(&self) -> &'static str {
        match self {
            TaskError::Validation { .. } => "read-inputs",
            TaskError::IntegrationLookup { .. } | TaskError::MissingSecret { .. } => {
                "build-environment"
            }
            TaskError::Publish { .. } => "publish-environment",
            TaskError::Download(_) => "download-binary",
            TaskError::Execution(_) => "run-frogbot",
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;
