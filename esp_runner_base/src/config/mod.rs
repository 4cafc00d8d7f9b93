//! Runner configuration
//!
//! Configuration is built in code, loaded from TOML, or both, and can be
//! adjusted through `ESP_RUNNER_*` environment variables.

pub mod errors;
pub mod runner;
pub mod target;

pub use errors::ConfigurationError;
pub use runner::{env_vars, RunnerConfig};
pub use target::{TargetConfig, DEFAULT_BACKEND, DEFAULT_COMMAND_TIMEOUT_SECS};
