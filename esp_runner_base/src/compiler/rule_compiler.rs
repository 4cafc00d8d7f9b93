//! Per-unit compilation of rules into check groups

use super::context::{ProfileContext, RuleEvaluator};
use super::errors::CompilationError;
use crate::logging::codes;
use crate::resources::ResourceFacade;
use crate::suite::{propagate_rule_id, CheckGroup, Metadata};
use std::sync::Arc;

/// Compiles content units with a rule-language evaluator
#[derive(Clone)]
pub struct RuleCompiler {
    evaluator: Arc<dyn RuleEvaluator>,
}

impl RuleCompiler {
    pub fn new(evaluator: Arc<dyn RuleEvaluator>) -> Self {
        Self { evaluator }
    }

    /// Compile one content unit
    ///
    /// All or nothing: on error no group from this unit is returned. Groups
    /// come out in rule order, then check order, each tagged with its rule id
    /// at every depth.
    pub fn compile(
        &self,
        profile_id: Option<&str>,
        facade: &ResourceFacade,
        content: &str,
        source_ref: &str,
        start_line: Option<usize>,
    ) -> Result<Vec<CheckGroup>, CompilationError> {
        let mut context = ProfileContext::new(profile_id, facade.clone());

        if let Err(e) = context.load(
            self.evaluator.as_ref(),
            content,
            source_ref,
            start_line.unwrap_or(1),
        ) {
            log_error!(codes::error::CONTENT_EVALUATION_FAILED, "Content evaluation failed",
                "source" => source_ref,
                "error" => &e
            );
            return Err(e.into());
        }

        let mut groups = Vec::new();
        for rule in context.into_rules() {
            if rule.id.trim().is_empty() {
                return Err(CompilationError::EmptyRuleId {
                    source_ref: source_ref.to_string(),
                });
            }

            for (index, check) in rule.checks.into_iter().enumerate() {
                if check.description.is_empty() {
                    return Err(CompilationError::EmptyDescription {
                        source_ref: source_ref.to_string(),
                        rule_id: rule.id.clone(),
                        index,
                    });
                }

                let mut group = match check.skip_reason() {
                    Some(reason) => {
                        log_debug!("Skipping check", "rule" => &rule.id, "reason" => &reason);
                        let metadata = Metadata::at(Some(source_ref), check.line);
                        let description = check.describe();
                        let subject = check.description.into_iter().next();
                        CheckGroup::skipped(description, subject, reason, metadata)
                    }
                    None => CheckGroup::from_check(check, Some(source_ref)),
                };

                propagate_rule_id(&mut group, &rule.id);
                groups.push(group);
            }
        }

        log_success!(codes::success::CONTENT_COMPILED, "Content compiled",
            "source" => source_ref,
            "groups" => groups.len()
        );
        Ok(groups)
    }
}

impl std::fmt::Debug for RuleCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleCompiler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CommandOutput, MockBackend};
    use crate::checks::{Assertion, Check, CheckBody, DescriptionArg, Matcher, Rule};
    use crate::compiler::EvaluationError;
    use crate::resources::facade::test_support;
    use crate::suite::ExampleBody;
    use assert_matches::assert_matches;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn facade() -> ResourceFacade {
        let backend = MockBackend::new().with_command("echo hi", CommandOutput::success("hi\n"));
        test_support::facade(Arc::new(backend))
    }

    fn compiler<F>(evaluate: F) -> RuleCompiler
    where
        F: Fn(&mut ProfileContext, &str, &str, usize) -> Result<(), EvaluationError>
            + Send
            + Sync
            + 'static,
    {
        RuleCompiler::new(Arc::new(evaluate))
    }

    #[test]
    fn test_normal_and_unsupported_checks_share_rule_id() {
        let body_ran = Arc::new(AtomicBool::new(false));
        let flag = body_ran.clone();

        let compiler = compiler(move |ctx: &mut ProfileContext, _: &str, _: &str, _: usize| {
            let echo = ctx.resources().resource("echo", &[json!("hi")]).unwrap();
            let unsupported = ctx.resources().resource("unsupported", &[]).unwrap();
            let flag = flag.clone();
            ctx.add_rule(
                Rule::new("rule-1")
                    .with_check(Check::new(
                        vec![echo.into()],
                        CheckBody::new().it(Assertion::expect("stdout", Matcher::Eq(json!("hi")))),
                    ))
                    .with_check(Check::new(
                        vec![unsupported.into()],
                        CheckBody::new().it(Assertion::custom("never runs", move |_| {
                            flag.store(true, Ordering::SeqCst);
                            Ok(())
                        })),
                    )),
            );
            Ok(())
        });

        let groups = compiler
            .compile(Some("profile"), &facade(), "", "rules/one.toml", None)
            .unwrap();

        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.id() == Some("rule-1")));
        assert!(!groups[0].is_skipped());

        let skipped = groups[1].all_examples();
        assert_eq!(skipped.len(), 1);
        assert_matches!(
            skipped[0].body,
            ExampleBody::Skip { ref reason } if reason == "Resource unsupported is not supported on this OS"
        );
        assert_eq!(skipped[0].metadata.id.as_deref(), Some("rule-1"));
        assert!(!body_ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_nested_examples_are_tagged() {
        let compiler = compiler(|ctx: &mut ProfileContext, _: &str, _: &str, _: usize| {
            let body = CheckBody::new().describe(
                "one",
                CheckBody::new().describe(
                    "two",
                    CheckBody::new().describe(
                        "three",
                        CheckBody::new().it(Assertion::expect("stdout", Matcher::Exist)),
                    ),
                ),
            );
            ctx.add_rule(
                Rule::new("deep").with_check(Check::new(vec![DescriptionArg::label("tree")], body)),
            );
            Ok(())
        });

        let groups = compiler.compile(None, &facade(), "", "deep.toml", Some(10)).unwrap();
        assert_eq!(groups[0].max_depth(), 4);
        let examples = groups[0].all_examples();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].metadata.id.as_deref(), Some("deep"));
    }

    #[test]
    fn test_rule_then_check_order() {
        let compiler = compiler(|ctx: &mut ProfileContext, _: &str, _: &str, _: usize| {
            for id in ["b", "a"] {
                let mut rule = Rule::new(id);
                for n in 1..=2 {
                    rule = rule.with_check(Check::new(
                        vec![DescriptionArg::label(format!("{}{}", id, n))],
                        CheckBody::new(),
                    ));
                }
                ctx.add_rule(rule);
            }
            Ok(())
        });

        let groups = compiler.compile(None, &facade(), "", "order.toml", None).unwrap();
        let order: Vec<&str> = groups.iter().map(|g| g.description.as_str()).collect();
        assert_eq!(order, vec!["b1", "b2", "a1", "a2"]);
    }

    #[test]
    fn test_evaluation_error_fails_whole_unit() {
        let compiler = compiler(|ctx: &mut ProfileContext, _: &str, source_ref: &str, line: usize| {
            ctx.add_rule(Rule::new("ok").with_check(Check::new(
                vec![DescriptionArg::label("fine")],
                CheckBody::new(),
            )));
            Err(EvaluationError::Syntax {
                source_ref: source_ref.to_string(),
                line: line + 2,
                reason: "unexpected token".to_string(),
            })
        });

        let err = compiler
            .compile(None, &facade(), "", "broken.toml", Some(5))
            .unwrap_err();
        assert_matches!(
            err,
            CompilationError::Evaluation(EvaluationError::Syntax { line: 7, .. })
        );
        assert_eq!(err.source_ref(), "broken.toml");
    }

    #[test]
    fn test_empty_description_is_rejected() {
        let compiler = compiler(|ctx: &mut ProfileContext, _: &str, _: &str, _: usize| {
            ctx.add_rule(Rule::new("r").with_check(Check::new(Vec::new(), CheckBody::new())));
            Ok(())
        });

        assert_matches!(
            compiler.compile(None, &facade(), "", "empty.toml", None),
            Err(CompilationError::EmptyDescription { index: 0, .. })
        );
    }
}
