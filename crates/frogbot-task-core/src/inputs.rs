use crate::error::{Result, TaskError};
use crate::host::TaskHost;
use serde::Serialize;

/// Task input names as declared by the pipeline task.
pub mod names {
    pub const REPOSITORY: &str = "repository";
    pub const ACCESS_TOKEN: &str = "accessToken";
    pub const GIT_TOKEN: &str = "gitToken";
    pub const PROVIDER: &str = "provider";
    pub const END_POINT: &str = "endPoint";
    pub const BOT_ACTION: &str = "botAction";
    pub const PLATFORM_URL: &str = "platformURL";
    pub const VERSION: &str = "version";
    pub const PULL_REQUEST_ID: &str = "pullRequestID";
}

/// Inputs of a single task run.
///
/// The two token fields hold integration names, not secret values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskInputs {
    /// `owner/repo`
    pub repository: String,
    pub access_token_integration: String,
    pub git_token_integration: String,
    pub git_provider: String,
    pub git_api_endpoint: String,
    pub bot_action: String,
    pub platform_url: String,
    /// Optional, may be empty.
    pub bot_version: String,
    /// Optional, may be empty.
    pub pull_request_id: String,
}

impl TaskInputs {
    /// Check that every mandatory input is non-empty.
    pub fn validate(&self) -> Result<()> {
        let mandatory = [
            (names::REPOSITORY, &self.repository),
            (names::ACCESS_TOKEN, &self.access_token_integration),
            (names::GIT_TOKEN, &self.git_token_integration),
            (names::PROVIDER, &self.git_provider),
            (names::END_POINT, &self.git_api_endpoint),
            (names::BOT_ACTION, &self.bot_action),
            (names::PLATFORM_URL, &self.platform_url),
        ];

        let missing: Vec<String> = mandatory
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(TaskError::Validation { missing })
        }
    }

    fn describe(&self) -> String {
        format!(
            "Inputs received\nRepository:{}\naccessToken:{}\ngitToken:{}\ngitProvider:{}\ngitEndPoint:{}\nbotAction:{}\nPlatformURL:{}\nversion:{}\npullRequestID:{}",
            self.repository,
            self.access_token_integration,
            self.git_token_integration,
            self.git_provider,
            self.git_api_endpoint,
            self.bot_action,
            self.platform_url,
            self.bot_version,
            self.pull_request_id,
        )
    }
}

/// Read the task inputs from the host and validate them.
pub fn read_inputs(host: &dyn TaskHost) -> Result<TaskInputs> {
    host.info("Reading task inputs");

    let inputs = TaskInputs {
        repository: host.get_input(names::REPOSITORY),
        access_token_integration: host.get_input(names::ACCESS_TOKEN),
        git_token_integration: host.get_input(names::GIT_TOKEN),
        git_provider: host.get_input(names::PROVIDER),
        git_api_endpoint: host.get_input(names::END_POINT),
        bot_action: host.get_input(names::BOT_ACTION),
        platform_url: host.get_input(names::PLATFORM_URL),
        bot_version: host.get_input(names::VERSION),
        pull_request_id: host.get_input(names::PULL_REQUEST_ID),
    };

    host.debug(&inputs.describe());
    inputs.validate()?;
    Ok(inputs)
}
