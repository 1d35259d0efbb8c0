use crate::error::{Result, TaskError};
use crate::host::TaskHost;
use crate::inputs::TaskInputs;
use crate::platform::OsFamily;
use crate::{binary, secrets};

/// Run frogbot with the requested action and relay its output.
///
/// Values listed in `masked` are replaced with `***` in the relayed output
/// and in the output carried by a failed run's error.
pub async fn run_bot(
    host: &dyn TaskHost,
    inputs: &TaskInputs,
    family: OsFamily,
    masked: &[&str],
) -> Result<()> {
    let binary = family.executable_name();
    host.info(&format!("Running frogbot scan... using:{}", binary));

    let path = binary::execution_path(host);
    let command = family.run_command(&path, &inputs.bot_action);

    let output = match host.execute(&command).await {
        Ok(output) => output,
        Err(e) => {
            let e = e.scrub(masked);
            if let Some(stdout) = e.stdout() {
                host.info(stdout);
            }
            host.error(&e.to_string());
            return Err(TaskError::Execution(e));
        }
    };

    if !output.stderr.trim().is_empty() {
        host.info(&secrets::scrub(output.stderr.trim_end(), masked));
    }
    if !output.stdout.trim().is_empty() {
        host.info(&secrets::scrub(output.stdout.trim_end(), masked));
    }
    Ok(())
}
