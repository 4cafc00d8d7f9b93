//! Local shell backend
//!
//! Runs commands through the host shell with a sanitised environment and a
//! per-command timeout.

use super::errors::CommandError;
use super::traits::{Backend, CommandOutput, OsInfo};
use super::transport::TransportFactory;
use crate::config::{ConfigurationError, TargetConfig};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Restricted PATH handed to every local command
const SANITIZED_PATH: &str = "/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";

/// Executes commands on the machine running the runner
#[derive(Debug, Clone)]
pub struct LocalBackend {
    os: OsInfo,
    timeout: Duration,
}

impl LocalBackend {
    /// Create backend with the default 30 second timeout
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(crate::config::DEFAULT_COMMAND_TIMEOUT_SECS))
    }

    /// Create backend with custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            os: OsInfo::current(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn shell_command(command: &str) -> Command {
        #[cfg(unix)]
        {
            let mut cmd = Command::new("sh");
            cmd.arg("-c")
                .arg(command)
                .env_clear() // Clear environment for security
                .env("PATH", SANITIZED_PATH)
                .env("LANG", "C");
            cmd
        }

        #[cfg(not(unix))]
        {
            let _ = SANITIZED_PATH;
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        }
    }
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for LocalBackend {
    fn name(&self) -> &str {
        "local"
    }

    fn os(&self) -> &OsInfo {
        &self.os
    }

    fn run_command(&self, command: &str) -> Result<CommandOutput, CommandError> {
        let start = Instant::now();

        let mut child = Self::shell_command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    CommandError::PermissionDenied {
                        command: command.to_string(),
                    }
                } else {
                    CommandError::SpawnFailed {
                        command: command.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        // Drain pipes concurrently so large outputs cannot stall the child
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match wait_timeout::ChildExt::wait_timeout(&mut child, self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                kill(&mut child);
                log_error!(crate::logging::codes::error::COMMAND_FAILED, "Command timed out",
                    "timeout_ms" => self.timeout.as_millis()
                );
                return Err(CommandError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                });
            }
            Err(e) => {
                kill(&mut child);
                return Err(CommandError::ExecutionFailed {
                    command: command.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        Ok(CommandOutput {
            stdout: collect(stdout),
            stderr: collect(stderr),
            exit_code: status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = pipe.read_to_end(&mut buffer);
            buffer
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).to_string())
        .unwrap_or_default()
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Transport producing [`LocalBackend`]s
#[derive(Debug, Default)]
pub struct LocalTransport;

impl TransportFactory for LocalTransport {
    fn name(&self) -> &str {
        "local"
    }

    fn connect(&self, target: &TargetConfig) -> Result<Arc<dyn Backend>, ConfigurationError> {
        if let Some(host) = target.host.as_deref() {
            if !matches!(host, "localhost" | "127.0.0.1" | "::1") {
                return Err(ConfigurationError::ConnectionFailed {
                    backend: "local".to_string(),
                    reason: format!("local backend cannot reach host '{}'", host),
                });
            }
        }
        Ok(Arc::new(LocalBackend::with_timeout(target.command_timeout())))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_captures_stdout_and_exit_code() {
        let backend = LocalBackend::new();
        let output = backend.run_command("echo hello; exit 3").unwrap();
        assert_eq!(output.stdout, "hello\n");
        assert_eq!(output.exit_code, 3);
    }

    #[test]
    fn test_captures_stderr() {
        let backend = LocalBackend::new();
        let output = backend.run_command("echo oops 1>&2").unwrap();
        assert_eq!(output.stderr, "oops\n");
        assert!(output.is_success());
    }

    #[test]
    fn test_environment_is_sanitised() {
        let backend = LocalBackend::new();
        let output = backend.run_command("echo $PATH").unwrap();
        assert_eq!(output.stdout.trim(), SANITIZED_PATH);
    }

    #[test]
    fn test_timeout_kills_command() {
        let backend = LocalBackend::with_timeout(Duration::from_millis(200));
        let result = backend.run_command("sleep 5");
        assert_matches!(result, Err(CommandError::Timeout { timeout_ms: 200 }));
    }

    #[test]
    fn test_transport_rejects_remote_host() {
        let target = TargetConfig::from_uri("local://example.com").unwrap();
        assert_matches!(
            LocalTransport.connect(&target).err(),
            Some(ConfigurationError::ConnectionFailed { .. })
        );
        assert!(LocalTransport.connect(&TargetConfig::local()).is_ok());
    }
}
