//! Backend handle bound to the session's escalation settings

use super::errors::CommandError;
use super::traits::{Backend, CommandOutput, OsInfo};
use crate::escalation::{CommandWrapper, EscalationConfig};
use std::fmt;
use std::sync::Arc;

/// Backend plus the command wrapper every dispatched command passes through
///
/// Cloning shares the underlying backend.
#[derive(Clone)]
pub struct Connection {
    backend: Arc<dyn Backend>,
    wrapper: Option<CommandWrapper>,
}

impl Connection {
    /// Bind a backend to an escalation configuration
    ///
    /// The wrapper is built once here; it only exists when escalation is
    /// requested and the backend is unix-like.
    pub fn new(backend: Arc<dyn Backend>, escalation: &EscalationConfig) -> Self {
        let wrapper = CommandWrapper::load(backend.os(), escalation);
        Self { backend, wrapper }
    }

    /// Connection that dispatches commands unchanged
    pub fn direct(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            wrapper: None,
        }
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    pub fn os(&self) -> &OsInfo {
        self.backend.os()
    }

    pub fn wrapper(&self) -> Option<&CommandWrapper> {
        self.wrapper.as_ref()
    }

    /// Command string that will reach the backend
    pub fn effective_command(&self, command: &str) -> String {
        match &self.wrapper {
            Some(wrapper) => wrapper.run(command),
            None => command.to_string(),
        }
    }

    /// Wrap and dispatch a command
    pub fn run_command(&self, command: &str) -> Result<CommandOutput, CommandError> {
        let effective = self.effective_command(command);

        log_debug!(
            "Dispatching command",
            "backend" => self.backend.name(),
            "command" => self.redacted(command)
        );

        self.backend.run_command(&effective)
    }

    fn redacted(&self, command: &str) -> String {
        match &self.wrapper {
            Some(wrapper) => wrapper.redacted(command),
            None => command.to_string(),
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("backend", &self.backend.name())
            .field("os", self.backend.os())
            .field("wrapper", &self.wrapper)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;

    #[test]
    fn test_commands_are_wrapped_before_dispatch() {
        let backend = Arc::new(MockBackend::new());
        let escalation = EscalationConfig::new().with_sudo().with_user("admin");
        let connection = Connection::new(backend.clone(), &escalation);

        connection.run_command("id").unwrap();
        assert_eq!(backend.commands(), vec!["sudo id".to_string()]);
    }

    #[test]
    fn test_root_user_dispatches_unchanged() {
        let backend = Arc::new(MockBackend::new());
        let escalation = EscalationConfig::new().with_sudo().with_user("root");
        let connection = Connection::new(backend.clone(), &escalation);

        connection.run_command("id").unwrap();
        assert_eq!(backend.commands(), vec!["id".to_string()]);
    }

    #[test]
    fn test_windows_backend_has_no_wrapper() {
        let backend = Arc::new(MockBackend::new().with_os(OsInfo::windows()));
        let escalation = EscalationConfig::new().with_sudo();
        let connection = Connection::new(backend, &escalation);

        assert!(connection.wrapper().is_none());
        assert_eq!(connection.effective_command("whoami"), "whoami");
    }
}
