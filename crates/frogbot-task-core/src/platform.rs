use crate::host::TaskHost;
use serde::Serialize;
use std::fmt;

const RELEASES_URL: &str = "https://releases.jfrog.io/artifactory/frogbot/v2/[RELEASE]";

/// Operating system family of the node the task runs on.
///
/// Resolved once per run; every command template hangs off this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    Posix,
}

impl OsFamily {
    /// Classify a host family name. Anything starting with `windows`
    /// (case-insensitive) is Windows, everything else is POSIX.
    pub fn from_family(family: &str) -> Self {
        if family.to_lowercase().starts_with("windows") {
            OsFamily::Windows
        } else {
            OsFamily::Posix
        }
    }

    /// Ask the host which family it runs on.
    pub fn detect(host: &dyn TaskHost) -> Self {
        let family = host.operating_system_family();
        let resolved = Self::from_family(&family);
        host.debug(&format!("Operating system family {} resolved as {}", family, resolved));
        resolved
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, OsFamily::Windows)
    }

    /// Name the frogbot binary is invoked by from the execution path.
    pub fn executable_name(&self) -> &'static str {
        match self {
            OsFamily::Windows => "frogbot.exe",
            OsFamily::Posix => "./frogbot",
        }
    }

    /// Shell command that fetches the frogbot binary.
    pub fn download_command(&self, execution_path: &str) -> String {
        match self {
            OsFamily::Windows => format!(
                "iwr {}/frogbot-windows-amd64/frogbot.exe -OutFile frogbot.exe",
                RELEASES_URL
            ),
            OsFamily::Posix => format!(
                "cd {} && curl -fLg \"{}/getFrogbot.sh\" | sh",
                execution_path, RELEASES_URL
            ),
        }
    }

    /// Shell command that runs frogbot with the given action.
    pub fn run_command(&self, execution_path: &str, action: &str) -> String {
        format!(
            "cd {} && {} {}",
            execution_path,
            self.executable_name(),
            action
        )
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::Windows => write!(f, "windows"),
            OsFamily::Posix => write!(f, "posix"),
        }
    }
}
