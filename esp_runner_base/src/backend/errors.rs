//! Command dispatch errors

/// Errors raised while running a command on a backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Failed to start shell for '{command}': {reason}")]
    SpawnFailed { command: String, reason: String },

    #[error("Execution failed for '{command}': {reason}")]
    ExecutionFailed { command: String, reason: String },

    #[error("Command timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Permission denied: {command}")]
    PermissionDenied { command: String },

    #[error("Connection to backend '{backend}' lost: {reason}")]
    ConnectionLost { backend: String, reason: String },
}

impl CommandError {
    /// Whether the backend itself is unusable, not just this command
    pub fn is_connection_error(&self) -> bool {
        matches!(self, CommandError::ConnectionLost { .. })
    }
}
