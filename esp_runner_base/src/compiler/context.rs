//! Evaluation context for one content unit

use super::errors::EvaluationError;
use crate::checks::Rule;
use crate::resources::ResourceFacade;

/// Turns content text into rules registered on a [`ProfileContext`]
///
/// This is the seam for rule languages; the runner never parses content
/// itself.
pub trait RuleEvaluator: Send + Sync {
    /// Evaluate `content`, attributing errors to `source_ref` starting at
    /// `line`
    fn evaluate(
        &self,
        context: &mut ProfileContext,
        content: &str,
        source_ref: &str,
        line: usize,
    ) -> Result<(), EvaluationError>;
}

impl<F> RuleEvaluator for F
where
    F: Fn(&mut ProfileContext, &str, &str, usize) -> Result<(), EvaluationError> + Send + Sync,
{
    fn evaluate(
        &self,
        context: &mut ProfileContext,
        content: &str,
        source_ref: &str,
        line: usize,
    ) -> Result<(), EvaluationError> {
        self(context, content, source_ref, line)
    }
}

/// Rules declared by one content unit, bound to a profile and a backend
#[derive(Debug)]
pub struct ProfileContext {
    profile_id: Option<String>,
    facade: ResourceFacade,
    rules: Vec<Rule>,
}

impl ProfileContext {
    pub fn new(profile_id: Option<&str>, facade: ResourceFacade) -> Self {
        Self {
            profile_id: profile_id.map(str::to_string),
            facade,
            rules: Vec::new(),
        }
    }

    pub fn profile_id(&self) -> Option<&str> {
        self.profile_id.as_deref()
    }

    /// Resource accessors bound to the session backend
    pub fn resources(&self) -> &ResourceFacade {
        &self.facade
    }

    /// Evaluate content into this context
    pub fn load(
        &mut self,
        evaluator: &dyn RuleEvaluator,
        content: &str,
        source_ref: &str,
        line: usize,
    ) -> Result<(), EvaluationError> {
        evaluator.evaluate(self, content, source_ref, line)
    }

    /// Register a rule; a later rule with the same id replaces the earlier
    /// one in place
    pub fn add_rule(&mut self, rule: Rule) {
        match self.rules.iter_mut().find(|existing| existing.id == rule.id) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }
}
