//! Configuration errors

/// Errors that abort a runner before any content is compiled
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Can't find transport backend '{name}' (available: {available:?})")]
    UnknownBackend { name: String, available: Vec<String> },

    #[error("Can't connect to transport backend '{backend}': {reason}")]
    ConnectionFailed { backend: String, reason: String },

    #[error("Backend '{backend}' requires '{field}'")]
    MissingCredentials { backend: String, field: String },

    #[error("Invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("Runner requires a {collaborator}")]
    MissingCollaborator { collaborator: String },

    #[error("Failed to read configuration '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Failed to parse configuration '{path}': {reason}")]
    Parse { path: String, reason: String },
}
