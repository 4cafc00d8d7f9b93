//! Backend trait and the values it exchanges

use super::errors::CommandError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Operating system family reported by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Unix,
    Windows,
    Unknown,
}

/// Operating system of the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    pub family: OsFamily,

    /// Lowercase platform name (`linux`, `macos`, `freebsd`, `windows`)
    pub name: String,
}

impl OsInfo {
    pub fn unix(name: impl Into<String>) -> Self {
        Self {
            family: OsFamily::Unix,
            name: name.into(),
        }
    }

    pub fn windows() -> Self {
        Self {
            family: OsFamily::Windows,
            name: "windows".to_string(),
        }
    }

    pub fn unknown() -> Self {
        Self {
            family: OsFamily::Unknown,
            name: "unknown".to_string(),
        }
    }

    /// OS of the process running the runner
    pub fn current() -> Self {
        let name = std::env::consts::OS;
        if cfg!(unix) {
            Self::unix(name)
        } else if cfg!(windows) {
            Self::windows()
        } else {
            Self {
                family: OsFamily::Unknown,
                name: name.to_string(),
            }
        }
    }

    pub fn is_unix(&self) -> bool {
        self.family == OsFamily::Unix
    }

    pub fn is_linux(&self) -> bool {
        self.is_unix() && self.name == "linux"
    }
}

impl std::fmt::Display for OsInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Live handle to the system under test
///
/// Command execution is blocking: implementations return only once the
/// command completed, failed or hit the backend's own timeout.
pub trait Backend: Send + Sync {
    /// Transport name this backend was created by
    fn name(&self) -> &str;

    /// Operating system of the target
    fn os(&self) -> &OsInfo;

    /// Run a shell command on the target
    fn run_command(&self, command: &str) -> Result<CommandOutput, CommandError>;
}

/// Command execution output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stderr: stderr.into(),
            exit_code,
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_info_families() {
        assert!(OsInfo::unix("linux").is_linux());
        assert!(!OsInfo::unix("macos").is_linux());
        assert!(OsInfo::unix("macos").is_unix());
        assert!(!OsInfo::windows().is_unix());
        assert!(!OsInfo::unknown().is_unix());
    }

    #[test]
    fn test_command_output_constructors() {
        let ok = CommandOutput::success("root\n");
        assert!(ok.is_success());
        assert_eq!(ok.stdout, "root\n");

        let failed = CommandOutput::failure(127, "not found");
        assert!(!failed.is_success());
        assert_eq!(failed.exit_code, 127);
    }
}
