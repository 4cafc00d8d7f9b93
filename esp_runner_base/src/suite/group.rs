//! Executable form of a check

use crate::checks::{Assertion, BodyItem, Check, CheckBody, DescriptionArg};

/// Identity and origin of a node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Owning rule id, set after compilation
    pub id: Option<String>,
    pub source: Option<String>,
    pub line: Option<usize>,
}

impl Metadata {
    pub fn at(source: Option<&str>, line: Option<usize>) -> Self {
        Self {
            id: None,
            source: source.map(str::to_string),
            line,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ExampleBody {
    Run(Assertion),
    /// Reports the reason without evaluating anything
    Skip { reason: String },
}

/// Concrete example produced by expanding a group
#[derive(Debug, Clone)]
pub struct Example {
    pub description: String,
    pub metadata: Metadata,
    pub body: ExampleBody,
}

impl Example {
    pub fn is_skip(&self) -> bool {
        matches!(self.body, ExampleBody::Skip { .. })
    }
}

#[derive(Debug, Clone)]
pub enum ExampleNode {
    Leaf(Example),
    Group(CheckGroup),
}

/// Named node with examples and nested groups in declaration order
#[derive(Debug, Clone)]
pub struct CheckGroup {
    pub description: String,
    pub metadata: Metadata,
    /// Set on top-level groups; nested groups inherit it
    pub subject: Option<DescriptionArg>,
    /// Property focus applied to examples below this group
    pub property: Option<String>,
    pub children: Vec<ExampleNode>,
}

impl CheckGroup {
    /// Compile a check's description and body, keeping nesting as declared
    pub fn from_check(check: Check, source: Option<&str>) -> Self {
        let metadata = Metadata::at(source, check.line);
        let description = check.describe();
        let subject = check.description.into_iter().next();
        let children = expand_body(check.body, &metadata);

        Self {
            description,
            metadata,
            subject,
            property: None,
            children,
        }
    }

    /// Placeholder whose only example reports `reason`
    pub fn skipped(
        description: impl Into<String>,
        subject: Option<DescriptionArg>,
        reason: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        let reason = reason.into();
        Self {
            description: description.into(),
            metadata: metadata.clone(),
            subject,
            property: None,
            children: vec![ExampleNode::Leaf(Example {
                description: reason.clone(),
                metadata,
                body: ExampleBody::Skip { reason },
            })],
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.metadata.id.as_deref()
    }

    /// Direct examples of this group
    pub fn examples(&self) -> impl Iterator<Item = &Example> {
        self.children.iter().filter_map(|node| match node {
            ExampleNode::Leaf(example) => Some(example),
            ExampleNode::Group(_) => None,
        })
    }

    /// Every example at any depth, in declaration order
    pub fn all_examples(&self) -> Vec<&Example> {
        let mut out = Vec::new();
        self.collect_examples(&mut out);
        out
    }

    fn collect_examples<'a>(&'a self, out: &mut Vec<&'a Example>) {
        for node in &self.children {
            match node {
                ExampleNode::Leaf(example) => out.push(example),
                ExampleNode::Group(group) => group.collect_examples(out),
            }
        }
    }

    pub fn count_examples(&self) -> usize {
        self.children
            .iter()
            .map(|node| match node {
                ExampleNode::Leaf(_) => 1,
                ExampleNode::Group(group) => group.count_examples(),
            })
            .sum()
    }

    /// Nesting depth; a group without subgroups has depth 1
    pub fn max_depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .filter_map(|node| match node {
                ExampleNode::Group(group) => Some(group.max_depth()),
                ExampleNode::Leaf(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    pub fn is_skipped(&self) -> bool {
        let examples = self.all_examples();
        !examples.is_empty() && examples.iter().all(|example| example.is_skip())
    }
}

fn expand_body(body: CheckBody, parent: &Metadata) -> Vec<ExampleNode> {
    body.items
        .into_iter()
        .map(|item| match item {
            BodyItem::Example {
                description,
                assertion,
            } => ExampleNode::Leaf(Example {
                description: description.unwrap_or_else(|| assertion.describe()),
                metadata: parent.clone(),
                body: ExampleBody::Run(assertion),
            }),
            BodyItem::Group {
                description,
                property,
                body,
            } => ExampleNode::Group(CheckGroup {
                description,
                metadata: parent.clone(),
                subject: None,
                property,
                children: expand_body(body, parent),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Matcher;
    use serde_json::json;

    fn nested_check() -> Check {
        let body = CheckBody::new()
            .it(Assertion::expect("exists", Matcher::BeTruthy))
            .describe(
                "permissions",
                CheckBody::new()
                    .example("is 0600", Assertion::expect("mode", Matcher::Eq(json!("0600"))))
                    .its("owner", CheckBody::new().it(Assertion::Expect(
                        crate::checks::Expectation::on_subject(Matcher::Eq(json!("root"))),
                    ))),
            );
        Check::new(vec![DescriptionArg::label("File /etc/shadow")], body).with_line(4)
    }

    #[test]
    fn test_from_check_preserves_nesting_and_order() {
        let group = CheckGroup::from_check(nested_check(), Some("rules/shadow.toml"));

        assert_eq!(group.description, "File /etc/shadow");
        assert_eq!(group.count_examples(), 3);
        assert_eq!(group.max_depth(), 3);
        assert_eq!(group.metadata.line, Some(4));

        let descriptions: Vec<&str> = group
            .all_examples()
            .iter()
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            vec!["exists should be truthy", "is 0600", "should eq \"root\""]
        );
        assert_eq!(group.examples().count(), 1);
    }

    #[test]
    fn test_skipped_group_has_single_reason_example() {
        let group = CheckGroup::skipped("Service sshd", None, "not supported on windows", Metadata::default());
        let examples = group.all_examples();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].description, "not supported on windows");
        assert!(group.is_skipped());
    }
}
