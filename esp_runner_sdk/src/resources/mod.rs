//! Resource types queried by checks
//!
//! Every resource runs its commands through the [`ResourceFacade`], so they
//! are escalated the same way regardless of type.

pub mod command;
pub mod file;
pub mod package;
pub mod service;

pub use command::{CommandFactory, CommandResource};
pub use file::{FileFactory, FileResource};
pub use package::{PackageFactory, PackageResource};
pub use service::{ServiceFactory, ServiceResource};

use esp_runner_base::backend::CommandOutput;
use esp_runner_base::resources::{ResourceError, ResourceFacade, ResourceRegistry};
use serde_json::Value;

/// Create a registry with all available resource types
///
/// Includes:
/// - `command`: stdout, stderr and exit status of a shell command
/// - `file`: existence, type, mode, ownership, size and content
/// - `package`: installation status and version (rpm or dpkg)
/// - `service`: running and enabled state (systemd)
pub fn create_resource_registry() -> Result<ResourceRegistry, ResourceError> {
    ResourceRegistry::new()
        .with(Box::new(CommandFactory))?
        .with(Box::new(FileFactory))?
        .with(Box::new(PackageFactory))?
        .with(Box::new(ServiceFactory))
}

/// Single-quote a value for `sh`
pub(crate) fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Required string argument at `index`
pub(crate) fn string_arg(type_id: &str, args: &[Value], index: usize, name: &str) -> Result<String, ResourceError> {
    match args.get(index) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(other) => Err(ResourceError::InvalidArguments {
            type_id: type_id.to_string(),
            reason: format!("'{}' must be a non-empty string, got {}", name, other),
        }),
        None => Err(ResourceError::InvalidArguments {
            type_id: type_id.to_string(),
            reason: format!("missing '{}'", name),
        }),
    }
}

/// Run a command for a resource, mapping dispatch failures
pub(crate) fn run(facade: &ResourceFacade, resource: &str, command: &str) -> Result<CommandOutput, ResourceError> {
    facade
        .run_command(command)
        .map_err(|source| ResourceError::CommandFailed {
            resource: resource.to_string(),
            source,
        })
}

/// Whether a tool answers `--version` on the target
pub(crate) fn has_tool(facade: &ResourceFacade, resource: &str, tool: &str) -> Result<bool, ResourceError> {
    Ok(run(facade, resource, &format!("{} --version", tool))?.is_success())
}

pub(crate) fn unknown_property(resource: String, property: &str) -> ResourceError {
    ResourceError::UnknownProperty {
        resource,
        property: property.to_string(),
    }
}
