//! Test reference resolution

use std::collections::HashMap;

/// One compilation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContent {
    pub content: String,
    pub source_ref: String,
    /// Line of `source_ref` the content starts at
    pub line: Option<usize>,
}

impl ResolvedContent {
    pub fn new(content: impl Into<String>, source_ref: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source_ref: source_ref.into(),
            line: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Test reference '{reference}' not found")]
    NotFound { reference: String },

    #[error("Failed to read '{reference}': {reason}")]
    Io { reference: String, reason: String },

    #[error("Unsupported test reference '{reference}': {reason}")]
    Unsupported { reference: String, reason: String },
}

/// Turns a raw test reference into content units
pub trait TargetResolver: Send + Sync {
    fn resolve(&self, reference: &str) -> Result<Vec<ResolvedContent>, ResolveError>;
}

/// In-memory resolver keyed by reference
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    entries: HashMap<String, Vec<ResolvedContent>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single-unit reference whose source is the reference itself
    pub fn with_content(mut self, reference: impl Into<String>, content: impl Into<String>) -> Self {
        let reference = reference.into();
        let unit = ResolvedContent::new(content, reference.clone());
        self.entries.entry(reference).or_default().push(unit);
        self
    }

    pub fn with_units(mut self, reference: impl Into<String>, units: Vec<ResolvedContent>) -> Self {
        self.entries.entry(reference.into()).or_default().extend(units);
        self
    }
}

impl TargetResolver for StaticResolver {
    fn resolve(&self, reference: &str) -> Result<Vec<ResolvedContent>, ResolveError> {
        self.entries
            .get(reference)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound {
                reference: reference.to_string(),
            })
    }
}
