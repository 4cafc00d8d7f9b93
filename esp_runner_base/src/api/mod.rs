//! # Runner API
//!
//! [`Runner`] is the top-level orchestrator: it resolves test references,
//! compiles them into the suite registry and executes the registry.

pub mod errors;
pub mod resolver;
pub mod runner;

pub use errors::RunnerError;
pub use resolver::{ResolveError, ResolvedContent, StaticResolver, TargetResolver};
pub use runner::{Runner, RunnerBuilder, RunnerState};
