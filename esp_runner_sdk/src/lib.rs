//! # ESP Runner SDK
//!
//! Concrete collaborators for the runner core: resource types for files,
//! commands, packages and services, a TOML rule evaluator and a file-system
//! test-reference resolver.

pub mod evaluator;
pub mod resolver;
pub mod resources;

pub use evaluator::TomlRuleEvaluator;
pub use resolver::FileSystemResolver;
pub use resources::create_resource_registry;

use esp_runner_base::api::RunnerBuilder;
use esp_runner_base::config::ConfigurationError;
use esp_runner_base::resources::ResourceError;
use esp_runner_base::{Runner, RunnerConfig};

/// Runner builder wired with every SDK collaborator
///
/// Transports default to the base registry (`local`). Callers can still add
/// transports before building.
pub fn runner_builder(config: RunnerConfig) -> Result<RunnerBuilder, ResourceError> {
    Ok(Runner::builder(config)
        .with_resources(create_resource_registry()?)
        .with_evaluator(TomlRuleEvaluator::new())
        .with_resolver(FileSystemResolver::new()))
}

/// Build a runner with the SDK collaborators
pub fn create_runner(config: RunnerConfig) -> Result<Runner, ConfigurationError> {
    runner_builder(config)
        .map_err(|e| ConfigurationError::MissingCollaborator {
            collaborator: format!("resource registry ({})", e),
        })?
        .build()
}
