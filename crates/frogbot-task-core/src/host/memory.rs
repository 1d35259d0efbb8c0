use super::{ExecOutput, HostError, Integration, TaskHost};
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Debug,
    Warn,
    Error,
}

#[derive(Debug, Default)]
struct Recorded {
    exported: Vec<(String, String)>,
    commands: Vec<String>,
    logs: Vec<(LogLevel, String)>,
    responses: VecDeque<Result<ExecOutput, HostError>>,
}

/// Fully scripted host. Records every export, command and log line.
///
/// Commands pop queued responses in order and succeed with empty output once
/// the queue is drained.
#[derive(Debug, Default)]
pub struct MemoryHost {
    inputs: BTreeMap<String, String>,
    variables: BTreeMap<String, String>,
    integrations: BTreeMap<String, Integration>,
    os_family: String,
    reject_export: Option<String>,
    recorded: Mutex<Recorded>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            os_family: "Linux".to_string(),
            ..Default::default()
        }
    }

    pub fn with_input(mut self, name: &str, value: &str) -> Self {
        self.inputs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_variable(mut self, name: &str, value: &str) -> Self {
        self.variables.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_integration(mut self, integration: Integration) -> Self {
        self.integrations
            .insert(integration.name.clone(), integration);
        self
    }

    pub fn with_os_family(mut self, family: &str) -> Self {
        self.os_family = family.to_string();
        self
    }

    /// Make exporting `key` fail.
    pub fn rejecting_export(mut self, key: &str) -> Self {
        self.reject_export = Some(key.to_string());
        self
    }

    /// Queue the result of the next `execute` call.
    pub fn push_response(&self, response: Result<ExecOutput, HostError>) {
        self.recorded().responses.push_back(response);
    }

    pub fn commands(&self) -> Vec<String> {
        self.recorded().commands.clone()
    }

    pub fn exported(&self) -> Vec<(String, String)> {
        self.recorded().exported.clone()
    }

    pub fn logs(&self) -> Vec<(LogLevel, String)> {
        self.recorded().logs.clone()
    }

    /// True when any log line at `level` contains `needle`.
    pub fn logged(&self, level: LogLevel, needle: &str) -> bool {
        self.recorded()
            .logs
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(needle))
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        // A poisoned lock only means a test already panicked.
        self.recorded.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn log(&self, level: LogLevel, msg: &str) {
        self.recorded().logs.push((level, msg.to_string()));
    }
}

#[async_trait]
impl TaskHost for MemoryHost {
    fn get_input(&self, name: &str) -> String {
        self.inputs.get(name).cloned().unwrap_or_default()
    }

    fn get_variable(&self, name: &str) -> String {
        self.variables.get(name).cloned().unwrap_or_default()
    }

    fn export_environment_variable(&self, name: &str, value: &str) -> Result<(), HostError> {
        if self.reject_export.as_deref() == Some(name) {
            return Err(HostError::Export(
                name.to_string(),
                "rejected by host".to_string(),
            ));
        }
        self.recorded()
            .exported
            .push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn get_integration(&self, name: &str) -> Result<Integration, HostError> {
        self.integrations
            .get(name)
            .cloned()
            .ok_or_else(|| HostError::IntegrationNotFound(name.to_string()))
    }

    fn operating_system_family(&self) -> String {
        self.os_family.clone()
    }

    async fn execute(&self, command: &str) -> Result<ExecOutput, HostError> {
        let mut recorded = self.recorded();
        recorded.commands.push(command.to_string());
        recorded
            .responses
            .pop_front()
            .unwrap_or_else(|| Ok(ExecOutput::default()))
    }

    fn info(&self, msg: &str) {
        self.log(LogLevel::Info, msg);
    }

    fn debug(&self, msg: &str) {
        self.log(LogLevel::Debug, msg);
    }

    fn warn(&self, msg: &str) {
        self.log(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.log(LogLevel::Error, msg);
    }
}
