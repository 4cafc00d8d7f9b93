//! File-system test references
//!
//! A file reference is one content unit. A directory reference yields every
//! rule file below it, in sorted path order.

use esp_runner_base::api::{ResolveError, ResolvedContent, TargetResolver};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Default rule file extension
pub const RULE_EXTENSION: &str = "toml";

#[derive(Debug, Clone)]
pub struct FileSystemResolver {
    extension: String,
}

impl FileSystemResolver {
    pub fn new() -> Self {
        Self {
            extension: RULE_EXTENSION.to_string(),
        }
    }

    /// Only collect files with this extension from directories
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    fn read(&self, path: &Path) -> Result<ResolvedContent, ResolveError> {
        let content = fs::read_to_string(path).map_err(|e| ResolveError::Io {
            reference: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(ResolvedContent::new(content, path.display().to_string()).at_line(1))
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext == self.extension)
    }
}

impl Default for FileSystemResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetResolver for FileSystemResolver {
    fn resolve(&self, reference: &str) -> Result<Vec<ResolvedContent>, ResolveError> {
        let path = Path::new(reference);
        if !path.exists() {
            return Err(ResolveError::NotFound {
                reference: reference.to_string(),
            });
        }

        if path.is_file() {
            return Ok(vec![self.read(path)?]);
        }

        let mut units = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| ResolveError::Io {
                reference: reference.to_string(),
                reason: e.to_string(),
            })?;
            if entry.file_type().is_file() && self.has_extension(entry.path()) {
                units.push(self.read(entry.path())?);
            }
        }
        Ok(units)
    }
}
