use super::{ExecOutput, HostError, Integration, TaskHost};
use crate::config::HostConfig;
use crate::platform::OsFamily;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tokio::process::Command;

/// Environment variable JFrog Pipelines sets on every node.
pub const OS_FAMILY_VAR: &str = "JFROG_OPERATING_SYSTEM_FAMILY";

/// Host backed by the real process environment and child processes.
#[derive(Debug, Default)]
pub struct ProcessHost {
    config: HostConfig,
    exported: Mutex<Vec<(String, String)>>,
}

impl ProcessHost {
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            exported: Mutex::new(Vec::new()),
        }
    }

    /// Variables exported so far, in export order. Re-exporting a name
    /// replaces its value in place.
    pub fn exported(&self) -> Vec<(String, String)> {
        self.exported
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn shell(&self) -> Vec<String> {
        if let Some(shell) = self.config.shell.as_ref().filter(|s| !s.is_empty()) {
            return shell.clone();
        }
        if OsFamily::from_family(&self.operating_system_family()).is_windows() {
            vec!["pwsh".into(), "-NoProfile".into(), "-Command".into()]
        } else {
            vec!["sh".into(), "-c".into()]
        }
    }

    fn integration_from_env(&self, name: &str) -> Option<Integration> {
        let prefix = format!("int_{}_", name);
        let values: BTreeMap<String, String> = std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|field| (field.to_string(), value))
            })
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(Integration {
                name: name.to_string(),
                values,
            })
        }
    }
}

/// Environment variable name an input is read from when not configured.
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.to_uppercase())
}

#[async_trait]
impl TaskHost for ProcessHost {
    fn get_input(&self, name: &str) -> String {
        self.config
            .inputs
            .get(name)
            .cloned()
            .or_else(|| std::env::var(input_env_name(name)).ok())
            .unwrap_or_default()
    }

    fn get_variable(&self, name: &str) -> String {
        self.config
            .variables
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
            .unwrap_or_default()
    }

    fn export_environment_variable(&self, name: &str, value: &str) -> Result<(), HostError> {
        if name.is_empty() || name.contains('=') || name.contains('\0') {
            return Err(HostError::Export(
                name.to_string(),
                "invalid variable name".to_string(),
            ));
        }
        if value.contains('\0') {
            return Err(HostError::Export(
                name.to_string(),
                "value contains a NUL byte".to_string(),
            ));
        }
        let mut exported = self
            .exported
            .lock()
            .map_err(|_| HostError::Export(name.to_string(), "export table poisoned".to_string()))?;
        match exported.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => exported.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn get_integration(&self, name: &str) -> Result<Integration, HostError> {
        if let Some(values) = self.config.integrations.get(name) {
            return Ok(Integration {
                name: name.to_string(),
                values: values.clone(),
            });
        }
        self.integration_from_env(name)
            .ok_or_else(|| HostError::IntegrationNotFound(name.to_string()))
    }

    fn operating_system_family(&self) -> String {
        self.config
            .os_family
            .clone()
            .or_else(|| std::env::var(OS_FAMILY_VAR).ok())
            .filter(|family| !family.trim().is_empty())
            .unwrap_or_else(|| std::env::consts::OS.to_string())
    }

    async fn execute(&self, command: &str) -> Result<ExecOutput, HostError> {
        let shell = self.shell();
        let (program, args) = shell
            .split_first()
            .ok_or_else(|| HostError::Spawn {
                command: command.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty shell"),
            })?;

        let output = Command::new(program)
            .args(args)
            .arg(command)
            .envs(self.exported())
            .output()
            .await
            .map_err(|source| HostError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(HostError::CommandFailed {
                command: command.to_string(),
                status: output.status.code(),
                stdout,
                stderr,
            });
        }

        Ok(ExecOutput { stdout, stderr })
    }

    fn info(&self, msg: &str) {
        tracing::info!("{}", msg);
    }

    fn debug(&self, msg: &str) {
        tracing::debug!("{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!("{}", msg);
    }
}
