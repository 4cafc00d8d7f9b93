//! # Runner Errors

use super::resolver::ResolveError;
use crate::compiler::CompilationError;
use crate::config::ConfigurationError;

/// Error type for runner operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Compilation error: {0}")]
    Compilation(#[from] CompilationError),

    /// Some units failed while others were registered
    #[error("{} content unit(s) failed to compile, {registered} group(s) registered", .failures.len())]
    PartialCompilation {
        failures: Vec<CompilationError>,
        registered: usize,
    },
}

impl RunnerError {
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, RunnerError::Configuration(_))
    }

    /// Rule content could not be resolved or compiled
    pub fn is_compilation_error(&self) -> bool {
        matches!(
            self,
            RunnerError::Resolve(_)
                | RunnerError::Compilation(_)
                | RunnerError::PartialCompilation { .. }
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            RunnerError::Configuration(e) => format!("Invalid runner configuration: {}", e),
            RunnerError::Resolve(e) => format!("Could not load tests: {}", e),
            RunnerError::Compilation(e) => format!("Could not compile tests: {}", e),
            RunnerError::PartialCompilation { failures, .. } => {
                let details: Vec<String> = failures.iter().map(|e| format!("  {}", e)).collect();
                format!("{}:\n{}", self, details.join("\n"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::EvaluationError;

    #[test]
    fn test_classification() {
        let config: RunnerError = ConfigurationError::UnknownBackend {
            name: "ssh".to_string(),
            available: vec!["local".to_string()],
        }
        .into();
        assert!(config.is_configuration_error());
        assert!(!config.is_compilation_error());

        let partial = RunnerError::PartialCompilation {
            failures: vec![CompilationError::Evaluation(EvaluationError::Syntax {
                source_ref: "a.toml".to_string(),
                line: 3,
                reason: "bad".to_string(),
            })],
            registered: 2,
        };
        assert!(partial.is_compilation_error());
        assert_eq!(
            partial.user_message(),
            "1 content unit(s) failed to compile, 2 group(s) registered:\n  a.toml:3: syntax error: bad"
        );
    }
}
