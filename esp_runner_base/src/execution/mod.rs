//! # Execution Engine
//!
//! Runs compiled check groups sequentially in registry order and reports
//! progress through a [`Reporter`] chosen by [`OutputFormat`].

pub mod engine;
pub mod format;
pub mod reporter;

pub use engine::ExecutionEngine;
pub use format::OutputFormat;
pub use reporter::{
    reporter_for, DocumentationReporter, JsonReporter, ProgressReporter, Reporter, SilentReporter,
};
