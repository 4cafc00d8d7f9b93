//! TOML rule files
//!
//! ```toml
//! [[rule]]
//! id = "sshd-01"
//! title = "sshd_config is protected"
//! impact = 0.7
//!
//! [[rule.check]]
//! resource = "file"
//! args = ["/etc/ssh/sshd_config"]
//!
//! [[rule.check.expect]]
//! property = "mode"
//! matcher = "eq"
//! value = "0600"
//!
//! [[rule.check.describe]]
//! property = "owner"
//! [[rule.check.describe.expect]]
//! matcher = "eq"
//! value = "root"
//! ```
//!
//! Within one body, `expect` entries run before nested `describe` groups.

use esp_runner_base::checks::{Assertion, BodyItem, Check, CheckBody, DescriptionArg, Expectation, Matcher, Rule};
use esp_runner_base::compiler::{EvaluationError, ProfileContext, RuleEvaluator};
use serde::Deserialize;
use serde_json::Value;
use std::ops::Range;
use toml::Spanned;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    #[serde(default)]
    rule: Vec<RuleSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSpec {
    id: Spanned<String>,
    title: Option<String>,
    impact: Option<f64>,
    #[serde(default)]
    check: Vec<CheckSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CheckSpec {
    resource: Option<Spanned<String>>,
    #[serde(default)]
    args: Vec<toml::Value>,
    label: Option<String>,
    #[serde(default)]
    expect: Vec<ExpectSpec>,
    #[serde(default)]
    describe: Vec<DescribeSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExpectSpec {
    description: Option<String>,
    property: Option<String>,
    matcher: Spanned<String>,
    value: Option<toml::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DescribeSpec {
    description: Option<String>,
    property: Option<String>,
    #[serde(default)]
    expect: Vec<ExpectSpec>,
    #[serde(default)]
    describe: Vec<DescribeSpec>,
}

/// Evaluates TOML rule files into a [`ProfileContext`]
#[derive(Debug, Clone, Default)]
pub struct TomlRuleEvaluator;

impl TomlRuleEvaluator {
    pub fn new() -> Self {
        Self
    }
}

/// Maps byte offsets of one content unit to source lines
struct Locator<'a> {
    content: &'a str,
    source_ref: &'a str,
    start_line: usize,
}

impl Locator<'_> {
    fn line(&self, span: &Range<usize>) -> usize {
        let before = self.content.get(..span.start).unwrap_or(self.content);
        self.start_line + before.matches('\n').count()
    }

    fn invalid_rule(&self, span: &Range<usize>, reason: impl Into<String>) -> EvaluationError {
        EvaluationError::InvalidRule {
            source_ref: self.source_ref.to_string(),
            line: self.line(span),
            reason: reason.into(),
        }
    }
}

impl RuleEvaluator for TomlRuleEvaluator {
    fn evaluate(
        &self,
        context: &mut ProfileContext,
        content: &str,
        source_ref: &str,
        line: usize,
    ) -> Result<(), EvaluationError> {
        let locator = Locator {
            content,
            source_ref,
            start_line: line,
        };

        let file: RuleFile = toml::from_str(content).map_err(|e| EvaluationError::Syntax {
            source_ref: source_ref.to_string(),
            line: e.span().map_or(line, |span| locator.line(&span)),
            reason: e.message().to_string(),
        })?;

        for spec in file.rule {
            let rule = build_rule(context, &locator, spec)?;
            context.add_rule(rule);
        }
        Ok(())
    }
}

fn build_rule(context: &ProfileContext, locator: &Locator<'_>, spec: RuleSpec) -> Result<Rule, EvaluationError> {
    let id_span = spec.id.span();
    let id = spec.id.into_inner();
    if id.trim().is_empty() {
        return Err(locator.invalid_rule(&id_span, "rule id must not be empty"));
    }

    let mut rule = Rule::new(id);
    rule.title = spec.title;
    rule.impact = spec.impact;

    for check in spec.check {
        let line = check
            .resource
            .as_ref()
            .map_or_else(|| locator.line(&id_span), |r| locator.line(&r.span()));
        let description = build_description(context, locator, &check)?;
        let body = build_body(locator, line, check.expect, check.describe)?;
        rule.checks.push(Check::new(description, body).with_line(line));
    }
    Ok(rule)
}

fn build_description(
    context: &ProfileContext,
    locator: &Locator<'_>,
    check: &CheckSpec,
) -> Result<Vec<DescriptionArg>, EvaluationError> {
    let mut description = Vec::new();

    if let Some(resource) = &check.resource {
        let span = resource.span();
        let type_id = resource.get_ref();
        let resources = context.resources();

        if !resources.has_resource_type(type_id) {
            return Err(EvaluationError::UnknownResource {
                source_ref: locator.source_ref.to_string(),
                line: locator.line(&span),
                type_id: type_id.clone(),
            });
        }

        let args: Vec<Value> = check
            .args
            .iter()
            .map(|arg| serde_json::to_value(arg).unwrap_or(Value::Null))
            .collect();

        let handle = resources.resource(type_id, &args).map_err(|e| EvaluationError::Resource {
            source_ref: locator.source_ref.to_string(),
            line: locator.line(&span),
            reason: e.to_string(),
        })?;
        description.push(DescriptionArg::Resource(handle));
    }

    if let Some(label) = &check.label {
        description.push(DescriptionArg::label(label.clone()));
    }
    Ok(description)
}

fn build_body(
    locator: &Locator<'_>,
    check_line: usize,
    expects: Vec<ExpectSpec>,
    groups: Vec<DescribeSpec>,
) -> Result<CheckBody, EvaluationError> {
    let mut body = CheckBody::new();

    for expect in expects {
        let span = expect.matcher.span();
        let expected = expect.value.as_ref().map(|v| serde_json::to_value(v).unwrap_or(Value::Null));
        let matcher = Matcher::from_parts(expect.matcher.get_ref(), expected)
            .map_err(|e| locator.invalid_rule(&span, e.to_string()))?;

        body.push(BodyItem::Example {
            description: expect.description,
            assertion: Assertion::Expect(Expectation {
                property: expect.property,
                matcher,
            }),
        });
    }

    for group in groups {
        let description = match (group.description, &group.property) {
            (Some(description), _) => description,
            (None, Some(property)) => property.clone(),
            (None, None) => {
                return Err(EvaluationError::InvalidRule {
                    source_ref: locator.source_ref.to_string(),
                    line: check_line,
                    reason: "describe needs a description or a property".to_string(),
                })
            }
        };
        let nested = build_body(locator, check_line, group.expect, group.describe)?;
        body.push(BodyItem::Group {
            description,
            property: group.property,
            body: nested,
        });
    }

    Ok(body)
}
