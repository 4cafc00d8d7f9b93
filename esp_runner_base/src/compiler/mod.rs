//! Rule Compiler
//!
//! Evaluates one unit of resolved content in a fresh [`ProfileContext`] and
//! turns every check of every rule into a [`CheckGroup`](crate::suite::CheckGroup)
//! tagged with the rule's id.

pub mod context;
pub mod errors;
pub mod rule_compiler;

pub use context::{ProfileContext, RuleEvaluator};
pub use errors::{CompilationError, EvaluationError};
pub use rule_compiler::RuleCompiler;
