//! Compilation errors

/// Content could not be evaluated into rules
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("{source_ref}:{line}: syntax error: {reason}")]
    Syntax {
        source_ref: String,
        line: usize,
        reason: String,
    },

    #[error("{source_ref}:{line}: unknown resource type '{type_id}'")]
    UnknownResource {
        source_ref: String,
        line: usize,
        type_id: String,
    },

    #[error("{source_ref}:{line}: invalid rule: {reason}")]
    InvalidRule {
        source_ref: String,
        line: usize,
        reason: String,
    },

    #[error("{source_ref}:{line}: resource error: {reason}")]
    Resource {
        source_ref: String,
        line: usize,
        reason: String,
    },
}

impl EvaluationError {
    pub fn source_ref(&self) -> &str {
        match self {
            EvaluationError::Syntax { source_ref, .. }
            | EvaluationError::UnknownResource { source_ref, .. }
            | EvaluationError::InvalidRule { source_ref, .. }
            | EvaluationError::Resource { source_ref, .. } => source_ref,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            EvaluationError::Syntax { line, .. }
            | EvaluationError::UnknownResource { line, .. }
            | EvaluationError::InvalidRule { line, .. }
            | EvaluationError::Resource { line, .. } => *line,
        }
    }
}

/// A content unit failed to compile; nothing from it was produced
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompilationError {
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error("{source_ref}: check {index} of rule '{rule_id}' has an empty description")]
    EmptyDescription {
        source_ref: String,
        rule_id: String,
        index: usize,
    },

    #[error("{source_ref}: rule with empty id")]
    EmptyRuleId { source_ref: String },
}

impl CompilationError {
    pub fn source_ref(&self) -> &str {
        match self {
            CompilationError::Evaluation(e) => e.source_ref(),
            CompilationError::EmptyDescription { source_ref, .. }
            | CompilationError::EmptyRuleId { source_ref } => source_ref,
        }
    }
}
