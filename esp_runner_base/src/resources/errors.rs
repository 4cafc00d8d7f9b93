//! Resource errors

use crate::backend::CommandError;

/// Errors raised while constructing or querying resources
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResourceError {
    #[error("Unknown resource type '{type_id}'")]
    UnknownResourceType { type_id: String },

    #[error("Resource type '{type_id}' is already registered")]
    DuplicateResourceType { type_id: String },

    #[error("Invalid arguments for resource '{type_id}': {reason}")]
    InvalidArguments { type_id: String, reason: String },

    #[error("Resource '{resource}' has no property '{property}'")]
    UnknownProperty { resource: String, property: String },

    #[error("Command failed for resource '{resource}': {source}")]
    CommandFailed {
        resource: String,
        source: CommandError,
    },

    #[error("Failed to parse output for resource '{resource}': {reason}")]
    ParseFailed { resource: String, reason: String },
}
