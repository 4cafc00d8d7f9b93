//! Scripted backend for tests and dry runs
//!
//! Responses are looked up by exact command first, then by suffix, so a
//! script written for `id` still answers `sudo id` once escalation wraps it.

use super::errors::CommandError;
use super::traits::{Backend, CommandOutput, OsInfo};
use super::transport::TransportFactory;
use crate::config::{ConfigurationError, TargetConfig};
use std::sync::{Arc, Mutex};

/// Backend answering commands from a script
#[derive(Debug)]
pub struct MockBackend {
    os: OsInfo,
    responses: Vec<(String, CommandOutput)>,
    fallback: CommandOutput,
    unreachable: bool,
    history: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Linux target where every unscripted command exits 127
    pub fn new() -> Self {
        Self {
            os: OsInfo::unix("linux"),
            responses: Vec::new(),
            fallback: CommandOutput::failure(127, "command not found"),
            unreachable: false,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Backend whose every command fails with a lost connection
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::new()
        }
    }

    pub fn with_os(mut self, os: OsInfo) -> Self {
        self.os = os;
        self
    }

    /// Script the output of a command
    pub fn with_command(mut self, command: impl Into<String>, output: CommandOutput) -> Self {
        self.responses.push((command.into(), output));
        self
    }

    /// Output for commands without a script entry
    pub fn with_fallback(mut self, output: CommandOutput) -> Self {
        self.fallback = output;
        self
    }

    /// Commands received so far, as dispatched
    pub fn commands(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lookup(&self, command: &str) -> CommandOutput {
        self.responses
            .iter()
            .find(|(scripted, _)| scripted == command)
            .or_else(|| {
                self.responses
                    .iter()
                    .find(|(scripted, _)| command.ends_with(&format!(" {}", scripted)))
            })
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn os(&self) -> &OsInfo {
        &self.os
    }

    fn run_command(&self, command: &str) -> Result<CommandOutput, CommandError> {
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(command.to_string());

        if self.unreachable {
            return Err(CommandError::ConnectionLost {
                backend: "mock".to_string(),
                reason: "backend is unreachable".to_string(),
            });
        }

        Ok(self.lookup(command))
    }
}

/// Transport handing out one shared [`MockBackend`]
#[derive(Debug, Clone)]
pub struct MockTransport {
    backend: Arc<MockBackend>,
}

impl MockTransport {
    pub fn new(backend: MockBackend) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Shared handle, for inspecting dispatched commands
    pub fn backend(&self) -> Arc<MockBackend> {
        Arc::clone(&self.backend)
    }
}

impl TransportFactory for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    fn connect(&self, _target: &TargetConfig) -> Result<Arc<dyn Backend>, ConfigurationError> {
        Ok(self.backend.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_exact_match_wins_over_suffix() {
        let backend = MockBackend::new()
            .with_command("id", CommandOutput::success("uid=1000"))
            .with_command("sudo id", CommandOutput::success("uid=0"));

        assert_eq!(backend.run_command("sudo id").unwrap().stdout, "uid=0");
        assert_eq!(backend.run_command("id").unwrap().stdout, "uid=1000");
    }

    #[test]
    fn test_suffix_match_answers_wrapped_command() {
        let backend = MockBackend::new().with_command("whoami", CommandOutput::success("root\n"));
        let output = backend.run_command("sudo -n whoami").unwrap();
        assert_eq!(output.stdout, "root\n");
        assert_eq!(backend.commands(), vec!["sudo -n whoami".to_string()]);
    }

    #[test]
    fn test_suffix_match_requires_word_boundary() {
        let backend = MockBackend::new().with_command("echo hi", CommandOutput::success("hi\n"));
        assert_eq!(backend.run_command("techo hi").unwrap().exit_code, 127);
        assert_eq!(backend.run_command("sudo -n echo hi").unwrap().stdout, "hi\n");
    }

    #[test]
    fn test_unscripted_command_uses_fallback() {
        let backend = MockBackend::new();
        assert_eq!(backend.run_command("uptime").unwrap().exit_code, 127);
    }

    #[test]
    fn test_unreachable_backend_fails_and_records() {
        let backend = MockBackend::unreachable();
        assert_matches!(
            backend.run_command("id"),
            Err(CommandError::ConnectionLost { .. })
        );
        assert_eq!(backend.commands().len(), 1);
    }
}
