use crate::error::{Result, TaskError};
use crate::host::TaskHost;
use crate::inputs::TaskInputs;
use crate::secrets::{self, SecretReference, ACCESS_TOKEN_FIELD, GIT_TOKEN_FIELD};
use serde::Serialize;
use std::fmt;

/// Pipeline variable naming the repository dependencies are resolved from.
pub const RESOLVE_REPO_VAR: &str = "RESOLVE_REPO";

/// Environment variables frogbot reads. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EnvKey {
    GitRepo,
    GitOwner,
    AccessToken,
    GitToken,
    GitProvider,
    GitApiEndpoint,
    GitPullRequestId,
    Url,
    InstallDepsCmd,
}

impl EnvKey {
    /// Every key, in export order.
    pub const ALL: [EnvKey; 9] = [
        EnvKey::GitRepo,
        EnvKey::GitOwner,
        EnvKey::AccessToken,
        EnvKey::GitToken,
        EnvKey::GitProvider,
        EnvKey::GitApiEndpoint,
        EnvKey::GitPullRequestId,
        EnvKey::Url,
        EnvKey::InstallDepsCmd,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::GitRepo => "JF_GIT_REPO",
            EnvKey::GitOwner => "JF_GIT_OWNER",
            EnvKey::AccessToken => "JF_ACCESS_TOKEN",
            EnvKey::GitToken => "JF_GIT_TOKEN",
            EnvKey::GitProvider => "JF_GIT_PROVIDER",
            EnvKey::GitApiEndpoint => "JF_GIT_API_ENDPOINT",
            EnvKey::GitPullRequestId => "JF_GIT_PULL_REQUEST_ID",
            EnvKey::Url => "JF_URL",
            EnvKey::InstallDepsCmd => "JF_INSTALL_DEPS_CMD",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, EnvKey::AccessToken | EnvKey::GitToken)
    }
}

impl fmt::Display for EnvKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One exported variable as shown to a human: secrets masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedactedEntry {
    pub key: &'static str,
    pub value: String,
}

/// The variables frogbot runs with, in export order.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedEnvironment {
    entries: Vec<(EnvKey, String)>,
}

impl ResolvedEnvironment {
    pub fn get(&self, key: EnvKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (EnvKey, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values of the secret keys, for scrubbing command output.
    pub fn secret_values(&self) -> Vec<&str> {
        self.iter()
            .filter(|(k, _)| k.is_secret())
            .map(|(_, v)| v)
            .collect()
    }

    pub fn redacted(&self) -> Vec<RedactedEntry> {
        self.iter()
            .map(|(key, value)| RedactedEntry {
                key: key.as_str(),
                value: if key.is_secret() {
                    secrets::redact_value(value)
                } else {
                    value.to_string()
                },
            })
            .collect()
    }
}

impl fmt::Debug for ResolvedEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.redacted().into_iter().map(|e| (e.key, e.value)))
            .finish()
    }
}

/// Split `owner/repo` into its first two `/`-separated segments.
///
/// A missing segment comes back empty; extra segments are dropped.
pub fn split_repository(repository: &str) -> (&str, &str) {
    let mut segments = repository.split('/');
    let owner = segments.next().unwrap_or("");
    let repo = segments.next().unwrap_or("");
    (owner, repo)
}

/// Derive the frogbot environment from the inputs and the two resolved secrets.
pub fn build_environment(host: &dyn TaskHost, inputs: &TaskInputs) -> Result<ResolvedEnvironment> {
    let (owner, repo) = split_repository(&inputs.repository);
    if owner.is_empty() || repo.is_empty() || inputs.repository.matches('/').count() != 1 {
        host.warn(&format!(
            "repository '{}' is not in owner/repo form, using owner '{}' and repo '{}'",
            inputs.repository, owner, repo
        ));
    }

    let access_token = secrets::resolve_secret(
        host,
        SecretReference::new(&inputs.access_token_integration, ACCESS_TOKEN_FIELD),
    )?;
    let git_token = secrets::resolve_secret(
        host,
        SecretReference::new(&inputs.git_token_integration, GIT_TOKEN_FIELD),
    )?;

    let install_deps_cmd = format!("jf npmc {}", host.get_variable(RESOLVE_REPO_VAR));

    let entries = EnvKey::ALL
        .iter()
        .map(|key| {
            let value = match key {
                EnvKey::GitRepo => repo.to_string(),
                EnvKey::GitOwner => owner.to_string(),
                EnvKey::AccessToken => access_token.clone(),
                EnvKey::GitToken => git_token.clone(),
                EnvKey::GitProvider => inputs.git_provider.clone(),
                EnvKey::GitApiEndpoint => inputs.git_api_endpoint.clone(),
                EnvKey::GitPullRequestId => inputs.pull_request_id.clone(),
                EnvKey::Url => inputs.platform_url.clone(),
                EnvKey::InstallDepsCmd => install_deps_cmd.clone(),
            };
            (*key, value)
        })
        .collect();

    Ok(ResolvedEnvironment { entries })
}

/// Export every variable into the host session, in order.
pub fn publish(host: &dyn TaskHost, env: &ResolvedEnvironment) -> Result<()> {
    for (key, value) in env.iter() {
        host.export_environment_variable(key.as_str(), value)
            .map_err(|source| TaskError::Publish {
                key: key.as_str().to_string(),
                source,
            })?;
    }
    Ok(())
}
