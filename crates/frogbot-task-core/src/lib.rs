pub mod binary;
pub mod config;
pub mod dispatch;
pub mod environment;
pub mod error;
pub mod host;
pub mod inputs;
pub mod platform;
pub mod secrets;
pub mod task;

pub use config::{load_config, HostConfig};
pub use environment::{EnvKey, ResolvedEnvironment};
pub use error::{Result, TaskError};
pub use host::{DryRunHost, MemoryHost, ProcessHost, TaskHost};
pub use inputs::TaskInputs;
pub use platform::OsFamily;
pub use task::{execute_task, TaskSummary};
