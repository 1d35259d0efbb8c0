use super::{ExecOutput, HostError, Integration, TaskHost};
use async_trait::async_trait;
use std::sync::Mutex;

/// Delegates to an inner host but never spawns anything: commands are
/// recorded and answered with empty output.
#[derive(Debug)]
pub struct DryRunHost<H> {
    inner: H,
    commands: Mutex<Vec<String>>,
}

impl<H: TaskHost> DryRunHost<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Commands that would have been executed, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }
}

#[async_trait]
impl<H: TaskHost> TaskHost for DryRunHost<H> {
    fn get_input(&self, name: &str) -> String {
        self.inner.get_input(name)
    }

    fn get_variable(&self, name: &str) -> String {
        self.inner.get_variable(name)
    }

    fn export_environment_variable(&self, name: &str, value: &str) -> Result<(), HostError> {
        self.inner.export_environment_variable(name, value)
    }

    fn get_integration(&self, name: &str) -> Result<Integration, HostError> {
        self.inner.get_integration(name)
    }

    fn operating_system_family(&self) -> String {
        self.inner.operating_system_family()
    }

    async fn execute(&self, command: &str) -> Result<ExecOutput, HostError> {
        self.inner.info(&format!("[dry-run] {}", command));
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command.to_string());
        }
        Ok(ExecOutput::default())
    }

    fn info(&self, msg: &str) {
        self.inner.info(msg);
    }

    fn debug(&self, msg: &str) {
        self.inner.debug(msg);
    }

    fn warn(&self, msg: &str) {
        self.inner.warn(msg);
    }

    fn error(&self, msg: &str) {
        self.inner.error(msg);
    }
}
