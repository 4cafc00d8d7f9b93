//! Example and group outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result status of an example or group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Passed,
    Failed,
    Skipped,
    Error,
}

impl OutcomeStatus {
    /// Severity used to combine statuses: skipped < passed < failed < error
    pub fn rank(self) -> u8 {
        match self {
            OutcomeStatus::Skipped => 0,
            OutcomeStatus::Passed => 1,
            OutcomeStatus::Failed => 2,
            OutcomeStatus::Error => 3,
        }
    }

    pub fn worst(self, other: OutcomeStatus) -> OutcomeStatus {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }

    /// Combined status of a set of statuses; empty sets are skipped
    pub fn combine(statuses: impl IntoIterator<Item = OutcomeStatus>) -> OutcomeStatus {
        statuses
            .into_iter()
            .fold(OutcomeStatus::Skipped, OutcomeStatus::worst)
    }

    pub fn is_failure(self) -> bool {
        matches!(self, OutcomeStatus::Failed | OutcomeStatus::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeStatus::Passed => "passed",
            OutcomeStatus::Failed => "failed",
            OutcomeStatus::Skipped => "skipped",
            OutcomeStatus::Error => "error",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleOutcome {
    /// Owning rule id
    pub id: Option<String>,
    pub description: String,
    /// Descriptions of every enclosing group and the example, space joined
    pub full_description: String,
    pub status: OutcomeStatus,
    /// Failure or error message, or the skip reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

/// Result of one top-level group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOutcome {
    pub id: Option<String>,
    pub description: String,
    pub status: OutcomeStatus,
    pub examples: Vec<ExampleOutcome>,
    pub duration_ms: u64,
}

impl GroupOutcome {
    pub fn new(
        id: Option<String>,
        description: String,
        examples: Vec<ExampleOutcome>,
        duration_ms: u64,
    ) -> Self {
        let status = OutcomeStatus::combine(examples.iter().map(|e| e.status));
        Self {
            id,
            description,
            status,
            examples,
            duration_ms,
        }
    }

    /// First failure or error message, if any
    pub fn first_problem(&self) -> Option<&ExampleOutcome> {
        self.examples.iter().find(|e| e.status.is_failure())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OutcomeStatus::*;

    #[test]
    fn test_combined_status() {
        assert_eq!(OutcomeStatus::combine([Passed, Skipped]), Passed);
        assert_eq!(OutcomeStatus::combine([Passed, Failed, Skipped]), Failed);
        assert_eq!(OutcomeStatus::combine([Failed, Error, Passed]), Error);
        assert_eq!(OutcomeStatus::combine([Skipped, Skipped]), Skipped);
        assert_eq!(OutcomeStatus::combine(std::iter::empty()), Skipped);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Error).unwrap(), "\"error\"");
    }
}
