use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Host configuration, typically loaded from `frogbot-task.toml`.
///
/// Anything left out here is read from the process environment by
/// [`ProcessHost`](crate::host::ProcessHost).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HostConfig {
    /// Task inputs keyed by input name (`repository`, `botAction`, ...).
    #[serde(default)]
    pub inputs: BTreeMap<String, String>,

    /// Pipeline variables such as `EXECUTION_PATH` and `RESOLVE_REPO`.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    /// Integrations keyed by name, each a table of field values.
    #[serde(default)]
    pub integrations: BTreeMap<String, BTreeMap<String, String>>,

    /// Overrides the detected operating system family.
    pub os_family: Option<String>,

    /// Overrides the shell used to run commands, e.g. `["bash", "-c"]`.
    pub shell: Option<Vec<String>>,
}

impl HostConfig {
    /// Apply a `KEY=VALUE` override to the inputs table.
    pub fn set_input(&mut self, pair: &str) -> anyhow::Result<()> {
        let (key, value) = split_pair(pair)?;
        self.inputs.insert(key, value);
        Ok(())
    }

    /// Apply a `KEY=VALUE` override to the variables table.
    pub fn set_variable(&mut self, pair: &str) -> anyhow::Result<()> {
        let (key, value) = split_pair(pair)?;
        self.variables.insert(key, value);
        Ok(())
    }
}

fn split_pair(pair: &str) -> anyhow::Result<(String, String)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => anyhow::bail!("Expected KEY=VALUE, got '{}'", pair),
    }
}

/// Load host configuration from a TOML file.
pub fn load_config(path: &Path) -> anyhow::Result<HostConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

    let config: HostConfig = toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid config file '{}': {}", path.display(), e))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
os_family = "Linux"

[inputs]
repository = "user/frogbot"
botAction = "scan-pull-request"

[variables]
EXECUTION_PATH = "/tmp/run"

[integrations.ghIntName]
token = "gh_secret"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.inputs["repository"], "user/frogbot");
        assert_eq!(config.variables["EXECUTION_PATH"], "/tmp/run");
        assert_eq!(config.integrations["ghIntName"]["token"], "gh_secret");
        assert_eq!(config.os_family.as_deref(), Some("Linux"));
        assert!(config.shell.is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/does/not/exist.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_set_input_pairs() {
        let mut config = HostConfig::default();
        config.set_input("botAction=scan-repository").unwrap();
        config.set_input("version=").unwrap();
        assert_eq!(config.inputs["botAction"], "scan-repository");
        assert_eq!(config.inputs["version"], "");
        assert!(config.set_input("novalue").is_err());
        assert!(config.set_variable("=x").is_err());
    }
}
