use crate::binary::download_binary;
use crate::dispatch::run_bot;
use crate::environment::{build_environment, publish};
use crate::error::Result;
use crate::host::TaskHost;
use crate::inputs::read_inputs;
use crate::platform::OsFamily;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What a successful run did.
#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub action: String,
    pub os_family: OsFamily,
    pub exported_keys: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TaskSummary {
    pub fn duration_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// Read inputs, prepare and publish the environment, download frogbot and
/// run it. Stops at the first failing step; variables already published
/// stay published.
pub async fn execute_task(host: &dyn TaskHost) -> Result<TaskSummary> {
    let started_at = Utc::now();

    let inputs = read_inputs(host)?;
    let env = build_environment(host, &inputs)?;
    publish(host, &env)?;
    host.info("Completed setting up frogbot environment.");

    let family = OsFamily::detect(host);
    download_binary(host, family).await?;
    host.info("Downloaded binary successfully");

    run_bot(host, &inputs, family, &env.secret_values()).await?;

    Ok(TaskSummary {
        action: inputs.bot_action,
        os_family: family,
        exported_keys: env.iter().map(|(k, _)| k.as_str().to_string()).collect(),
        started_at,
        finished_at: Utc::now(),
    })
}
