//! Ordered collection of compiled groups

use super::group::CheckGroup;

/// Check groups owned by one runner, in registration order
#[derive(Debug, Clone, Default)]
pub struct TestSuiteRegistry {
    groups: Vec<CheckGroup>,
}

impl TestSuiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, group: CheckGroup) {
        self.groups.push(group);
    }

    pub fn register_all(&mut self, groups: impl IntoIterator<Item = CheckGroup>) {
        self.groups.extend(groups);
    }

    /// Groups in execution order
    ///
    /// Arrival order is declaration order: rules in content order, checks in
    /// rule order. Groups are never reordered across rules.
    pub fn ordered_groups(&self) -> &[CheckGroup] {
        &self.groups
    }

    /// Rule ids in first-seen order, without repeats
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in self.groups.iter().filter_map(CheckGroup::id) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::{propagate_rule_id, Metadata};

    fn tagged(description: &str, id: &str) -> CheckGroup {
        let mut group = CheckGroup::skipped(description, None, "n/a", Metadata::default());
        propagate_rule_id(&mut group, id);
        group
    }

    #[test]
    fn test_arrival_order_is_kept() {
        let mut registry = TestSuiteRegistry::new();
        registry.register(tagged("b", "rule-2"));
        registry.register_all(vec![tagged("a", "rule-1"), tagged("c", "rule-2")]);

        let order: Vec<&str> = registry
            .ordered_groups()
            .iter()
            .map(|g| g.description.as_str())
            .collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(registry.ids(), vec!["rule-2", "rule-1"]);

        registry.clear();
        assert!(registry.is_empty());
    }
}
