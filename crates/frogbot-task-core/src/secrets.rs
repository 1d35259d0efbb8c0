use crate::error::{Result, TaskError};
use crate::host::TaskHost;

/// Field holding the JFrog platform access token.
pub const ACCESS_TOKEN_FIELD: &str = "accessToken";
/// Field holding the git provider token.
pub const GIT_TOKEN_FIELD: &str = "token";

/// An (integration, field) pair pointing at a secret value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretReference<'a> {
    pub integration: &'a str,
    pub field: &'a str,
}

impl<'a> SecretReference<'a> {
    pub fn new(integration: &'a str, field: &'a str) -> Self {
        Self { integration, field }
    }
}

/// Look up a secret through the host. Never cached.
pub fn resolve_secret(host: &dyn TaskHost, reference: SecretReference<'_>) -> Result<String> {
    host.info("reading from generic integration");

    let integration = host.get_integration(reference.integration).map_err(|source| {
        host.error(&format!(
            "failed to fetch integration: {}",
            reference.integration
        ));
        TaskError::IntegrationLookup {
            integration: reference.integration.to_string(),
            source,
        }
    })?;

    let value = integration.get_value(reference.field);
    if value.is_empty() {
        return Err(TaskError::MissingSecret {
            integration: reference.integration.to_string(),
            field: reference.field.to_string(),
        });
    }

    host.debug(&format!(
        "resolved {}.{} ({})",
        reference.integration,
        reference.field,
        redact_value(value)
    ));
    Ok(value.to_string())
}

/// Keep at most the first four characters of a secret.
pub fn redact_value(value: &str) -> String {
    match value.char_indices().nth(4) {
        Some((idx, _)) => format!("{}****", &value[..idx]),
        None => "****".to_string(),
    }
}

/// Replace every occurrence of the given secrets in `text`.
pub fn scrub(text: &str, secrets: &[&str]) -> String {
    let mut result = text.to_string();
    for secret in secrets.iter().filter(|s| !s.is_empty()) {
        result = result.replace(secret, "***");
    }
    result
}
