use crate::error::{Result, TaskError};
use crate::host::TaskHost;
use crate::platform::OsFamily;

/// Pipeline variable naming the directory frogbot is installed and run in.
pub const EXECUTION_PATH_VAR: &str = "EXECUTION_PATH";

/// Directory frogbot lives in; `.` when the host does not provide one.
pub fn execution_path(host: &dyn TaskHost) -> String {
    let path = host.get_variable(EXECUTION_PATH_VAR);
    if path.trim().is_empty() {
        host.debug("Execution path not defined, using current directory");
        ".".to_string()
    } else {
        host.debug(&format!("Execution path defined as:{}", path));
        path
    }
}

/// Fetch the frogbot binary for the given family. A failed download is fatal.
pub async fn download_binary(host: &dyn TaskHost, family: OsFamily) -> Result<()> {
    let path = execution_path(host);
    let command = family.download_command(&path);

    match host.execute(&command).await {
        Ok(output) => {
            if !output.stderr.trim().is_empty() {
                host.error(output.stderr.trim_end());
            } else if !output.stdout.trim().is_empty() {
                host.info(output.stdout.trim_end());
            }
            Ok(())
        }
        Err(e) => {
            if let Some(stdout) = e.stdout() {
                host.info(stdout);
            }
            host.error(&e.to_string());
            Err(TaskError::Download(e))
        }
    }
}
