//! Sequential check execution

use super::format::OutputFormat;
use super::reporter::{reporter_for, Reporter, SilentReporter};
use crate::checks::{AssertionError, DescriptionArg, Subject};
use crate::logging::codes;
use crate::results::{ExampleOutcome, GroupOutcome, OutcomeStatus, ResultSet};
use crate::suite::{CheckGroup, Example, ExampleBody, ExampleNode};
use chrono::Utc;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Main execution engine: runs groups in the order given
pub struct ExecutionEngine {
    reporter: Box<dyn Reporter>,
    reporter_failed: bool,
}

/// Where the walk currently is inside a top-level group
struct Scope<'a> {
    subject: Option<&'a DescriptionArg>,
    property_path: Vec<String>,
    descriptions: Vec<&'a str>,
}

impl ExecutionEngine {
    pub fn new(reporter: Box<dyn Reporter>) -> Self {
        Self {
            reporter,
            reporter_failed: false,
        }
    }

    /// Engine that reports nothing
    pub fn silent() -> Self {
        Self::new(Box::new(SilentReporter))
    }

    pub fn with_format(format: OutputFormat, out: Box<dyn Write + Send>) -> Self {
        Self::new(reporter_for(format, out))
    }

    /// Engine reporting to standard output
    pub fn stdout(format: OutputFormat) -> Self {
        Self::with_format(format, Box::new(io::stdout()))
    }

    /// Execute groups depth-first in declaration order
    pub fn execute(&mut self, groups: &[CheckGroup]) -> ResultSet {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(groups.len());

        for group in groups {
            let start = Instant::now();
            let mut examples = Vec::new();
            let mut scope = Scope {
                subject: None,
                property_path: Vec::new(),
                descriptions: Vec::new(),
            };

            self.execute_group(group, &mut scope, 0, &mut examples);

            outcomes.push(GroupOutcome::new(
                group.metadata.id.clone(),
                group.description.clone(),
                examples,
                start.elapsed().as_millis() as u64,
            ));
        }

        let results = ResultSet::new(outcomes, started_at, Utc::now());
        self.report(|reporter| reporter.finished(&results));

        log_success!(codes::success::RUN_COMPLETED, "Run completed",
            "groups" => results.summary.groups,
            "examples" => results.summary.examples,
            "failed" => results.summary.failed,
            "errors" => results.summary.errors
        );
        results
    }

    /// Recursive walk; nested groups inherit the subject and extend the
    /// property focus
    fn execute_group<'a>(
        &mut self,
        group: &'a CheckGroup,
        scope: &mut Scope<'a>,
        depth: usize,
        out: &mut Vec<ExampleOutcome>,
    ) {
        self.report(|reporter| reporter.group_started(&group.description, depth));

        let outer_subject = scope.subject;
        if group.subject.is_some() {
            scope.subject = group.subject.as_ref();
        }
        if let Some(property) = &group.property {
            scope.property_path.push(property.clone());
        }
        scope.descriptions.push(&group.description);

        for node in &group.children {
            match node {
                ExampleNode::Leaf(example) => {
                    let outcome = self.execute_example(example, scope);
                    self.report(|reporter| reporter.example_finished(&outcome, depth));
                    out.push(outcome);
                }
                ExampleNode::Group(child) => self.execute_group(child, scope, depth + 1, out),
            }
        }

        scope.descriptions.pop();
        if group.property.is_some() {
            scope.property_path.pop();
        }
        scope.subject = outer_subject;
    }

    fn execute_example(&self, example: &Example, scope: &Scope<'_>) -> ExampleOutcome {
        let start = Instant::now();

        let (status, message) = match &example.body {
            ExampleBody::Skip { reason } => (OutcomeStatus::Skipped, Some(reason.clone())),
            ExampleBody::Run(assertion) => {
                let subject = Subject::new(scope.subject, &scope.property_path);
                let result = panic::catch_unwind(AssertUnwindSafe(|| assertion.evaluate(&subject)))
                    .unwrap_or_else(|payload| {
                        Err(AssertionError::Errored {
                            message: panic_message(payload.as_ref()),
                        })
                    });

                match result {
                    Ok(()) => (OutcomeStatus::Passed, None),
                    Err(AssertionError::Failed { message }) => (OutcomeStatus::Failed, Some(message)),
                    Err(AssertionError::Errored { message }) => {
                        log_error!(codes::error::EXAMPLE_ERRORED, "Example raised an error",
                            "example" => &example.description,
                            "error" => &message
                        );
                        (OutcomeStatus::Error, Some(message))
                    }
                }
            }
        };

        let mut full_description = scope.descriptions.join(" ");
        if !full_description.is_empty() {
            full_description.push(' ');
        }
        full_description.push_str(&example.description);

        ExampleOutcome {
            id: example.metadata.id.clone(),
            description: example.description.clone(),
            full_description,
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
            source: example.metadata.source.clone(),
            line: example.metadata.line,
        }
    }

    /// Reporter output errors are logged once and otherwise ignored
    fn report<F>(&mut self, event: F)
    where
        F: FnOnce(&mut dyn Reporter) -> io::Result<()>,
    {
        if let Err(e) = event(self.reporter.as_mut()) {
            if !self.reporter_failed {
                log_warning!("Reporter output failed", "error" => e);
                self.reporter_failed = true;
            }
        }
    }
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::stdout(OutputFormat::default())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}
