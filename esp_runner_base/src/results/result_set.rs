//! Aggregate results of a run

use super::outcome::{ExampleOutcome, GroupOutcome, OutcomeStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts and timing of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub run_id: String,
    pub hostname: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub groups: usize,
    pub examples: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl Summary {
    fn from_groups(groups: &[GroupOutcome], started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
        let mut summary = Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            hostname: local_hostname(),
            started_at,
            finished_at,
            duration_ms: (finished_at - started_at).num_milliseconds().max(0) as u64,
            groups: groups.len(),
            examples: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
            errors: 0,
        };

        for example in groups.iter().flat_map(|g| g.examples.iter()) {
            summary.examples += 1;
            match example.status {
                OutcomeStatus::Passed => summary.passed += 1,
                OutcomeStatus::Failed => summary.failed += 1,
                OutcomeStatus::Skipped => summary.skipped += 1,
                OutcomeStatus::Error => summary.errors += 1,
            }
        }
        summary
    }
}

fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Outcome of executing a registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub summary: Summary,
    pub groups: Vec<GroupOutcome>,
}

impl ResultSet {
    pub fn new(groups: Vec<GroupOutcome>, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
        Self {
            summary: Summary::from_groups(&groups, started_at, finished_at),
            groups,
        }
    }

    /// Result of a run with nothing registered
    pub fn empty() -> Self {
        let now = Utc::now();
        Self::new(Vec::new(), now, now)
    }

    /// True when no example failed or errored
    pub fn passed(&self) -> bool {
        self.summary.failed == 0 && self.summary.errors == 0
    }

    pub fn status(&self) -> OutcomeStatus {
        OutcomeStatus::combine(self.groups.iter().map(|g| g.status))
    }

    pub fn examples(&self) -> impl Iterator<Item = &ExampleOutcome> {
        self.groups.iter().flat_map(|g| g.examples.iter())
    }

    /// Groups compiled from the rule `id`
    pub fn outcomes_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GroupOutcome> + 'a {
        self.groups
            .iter()
            .filter(move |g| g.id.as_deref() == Some(id))
    }

    /// Combined status per rule id
    pub fn by_rule(&self) -> BTreeMap<String, OutcomeStatus> {
        let mut statuses: BTreeMap<String, OutcomeStatus> = BTreeMap::new();
        for group in &self.groups {
            let Some(id) = group.id.clone() else { continue };
            statuses
                .entry(id)
                .and_modify(|status| *status = status.worst(group.status))
                .or_insert(group.status);
        }
        statuses
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(id: &str, status: OutcomeStatus) -> ExampleOutcome {
        ExampleOutcome {
            id: Some(id.to_string()),
            description: "example".to_string(),
            full_description: "group example".to_string(),
            status,
            message: None,
            duration_ms: 0,
            source: None,
            line: None,
        }
    }

    fn group(id: &str, statuses: &[OutcomeStatus]) -> GroupOutcome {
        GroupOutcome::new(
            Some(id.to_string()),
            "group".to_string(),
            statuses.iter().map(|s| example(id, *s)).collect(),
            0,
        )
    }

    #[test]
    fn test_summary_counts_and_rule_map() {
        let now = Utc::now();
        let set = ResultSet::new(
            vec![
                group("r1", &[OutcomeStatus::Passed, OutcomeStatus::Skipped]),
                group("r1", &[OutcomeStatus::Failed]),
                group("r2", &[OutcomeStatus::Skipped]),
            ],
            now,
            now,
        );

        assert_eq!(set.summary.examples, 4);
        assert_eq!(set.summary.passed, 1);
        assert_eq!(set.summary.failed, 1);
        assert_eq!(set.summary.skipped, 2);
        assert!(!set.passed());
        assert_eq!(set.outcomes_for("r1").count(), 2);

        let by_rule = set.by_rule();
        assert_eq!(by_rule["r1"], OutcomeStatus::Failed);
        assert_eq!(by_rule["r2"], OutcomeStatus::Skipped);
    }

    #[test]
    fn test_json_output() {
        let set = ResultSet::empty();
        assert!(set.passed());
        let value: serde_json::Value = serde_json::from_str(&set.to_json().unwrap()).unwrap();
        assert_eq!(value["summary"]["examples"], 0);
        assert!(value["summary"]["run_id"].is_string());
    }
}
