//! # Runner
//!
//! Session lifecycle: `Configured` on build, `TestsAdded` after any
//! `add_tests`/`add_content`, `Executed` after `run`. Adding tests after a run
//! starts a fresh registry snapshot.

use super::errors::RunnerError;
use super::resolver::{ResolvedContent, TargetResolver};
use crate::backend::{Backend, Connection, TransportFactory, TransportRegistry};
use crate::compiler::{CompilationError, RuleCompiler, RuleEvaluator};
use crate::config::{ConfigurationError, RunnerConfig, TargetConfig};
use crate::execution::ExecutionEngine;
use crate::logging::codes;
use crate::resources::{ResourceFacade, ResourceRegistry};
use crate::results::ResultSet;
use crate::suite::TestSuiteRegistry;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Configured,
    TestsAdded,
    Executed,
}

/// Top-level orchestrator for one session against one target
pub struct Runner {
    config: RunnerConfig,
    facade: ResourceFacade,
    compiler: RuleCompiler,
    resolver: Box<dyn TargetResolver>,
    registry: TestSuiteRegistry,
    state: RunnerState,
}

impl Runner {
    pub fn builder(config: RunnerConfig) -> RunnerBuilder {
        RunnerBuilder::new(config)
    }

    /// Connect to the target through the named transport
    pub fn create_backend(
        transports: &TransportRegistry,
        target: &TargetConfig,
    ) -> Result<Arc<dyn Backend>, ConfigurationError> {
        transports.create_backend(target)
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn resources(&self) -> &ResourceFacade {
        &self.facade
    }

    pub fn registry(&self) -> &TestSuiteRegistry {
        &self.registry
    }

    /// Resolve references and compile every unit into the registry
    ///
    /// References are all resolved before anything is compiled. Units that
    /// compile are kept even when a later unit fails. With `fail_fast` the
    /// first failure is returned immediately; otherwise failures are collected
    /// into [`RunnerError::PartialCompilation`]. Returns the number of groups
    /// registered by this call.
    pub fn add_tests<S: AsRef<str>>(&mut self, references: &[S]) -> Result<usize, RunnerError> {
        let mut units: Vec<ResolvedContent> = Vec::new();
        for reference in references {
            let reference = reference.as_ref();
            let resolved = self.resolver.resolve(reference).map_err(|e| {
                log_error!(codes::error::RESOLUTION_FAILED, "Failed to resolve test reference",
                    "reference" => reference,
                    "error" => &e
                );
                e
            })?;
            log_debug!("Resolved test reference", "reference" => reference, "units" => resolved.len());
            units.extend(resolved);
        }

        let mut registered = 0;
        let mut failures: Vec<CompilationError> = Vec::new();
        for unit in units {
            match self.add_content(&unit.content, &unit.source_ref, unit.line) {
                Ok(count) => registered += count,
                Err(e) if self.config.fail_fast => return Err(e.into()),
                Err(e) => failures.push(e),
            }
        }

        if failures.is_empty() {
            Ok(registered)
        } else {
            Err(RunnerError::PartialCompilation {
                failures,
                registered,
            })
        }
    }

    /// Compile one content unit and register its groups
    pub fn add_content(
        &mut self,
        content: &str,
        source_ref: &str,
        line: Option<usize>,
    ) -> Result<usize, CompilationError> {
        self.begin_snapshot();

        let groups = self.compiler.compile(
            self.config.profile_id.as_deref(),
            &self.facade,
            content,
            source_ref,
            line,
        )?;

        let count = groups.len();
        self.registry.register_all(groups);
        self.state = RunnerState::TestsAdded;
        Ok(count)
    }

    /// Execute the registry, reporting to stdout in the configured format
    pub fn run(&mut self) -> ResultSet {
        let mut engine = ExecutionEngine::stdout(self.config.output_format());
        self.run_with(&mut engine)
    }

    /// Execute the registry with a caller-supplied engine
    pub fn run_with(&mut self, engine: &mut ExecutionEngine) -> ResultSet {
        log_info!("Executing registry", "groups" => self.registry.len());
        let results = engine.execute(self.registry.ordered_groups());
        self.state = RunnerState::Executed;
        results
    }

    fn begin_snapshot(&mut self) {
        if self.state == RunnerState::Executed {
            log_debug!("Starting new registry snapshot", "discarded" => self.registry.len());
            self.registry.clear();
            self.state = RunnerState::Configured;
        }
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("groups", &self.registry.len())
            .finish_non_exhaustive()
    }
}

/// Builder wiring a runner to its collaborators
pub struct RunnerBuilder {
    config: RunnerConfig,
    transports: TransportRegistry,
    resources: ResourceRegistry,
    evaluator: Option<Arc<dyn RuleEvaluator>>,
    resolver: Option<Box<dyn TargetResolver>>,
}

impl RunnerBuilder {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            transports: TransportRegistry::with_defaults(),
            resources: ResourceRegistry::new(),
            evaluator: None,
            resolver: None,
        }
    }

    /// Replace the transport registry
    pub fn with_transports(mut self, transports: TransportRegistry) -> Self {
        self.transports = transports;
        self
    }

    /// Add one transport to the registry
    pub fn with_transport(mut self, transport: impl TransportFactory + 'static) -> Self {
        self.transports.register(Box::new(transport));
        self
    }

    pub fn with_resources(mut self, resources: ResourceRegistry) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_evaluator(mut self, evaluator: impl RuleEvaluator + 'static) -> Self {
        self.evaluator = Some(Arc::new(evaluator));
        self
    }

    pub fn with_resolver(mut self, resolver: impl TargetResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Connect to the target and produce a configured runner
    pub fn build(self) -> Result<Runner, ConfigurationError> {
        let evaluator = self
            .evaluator
            .ok_or_else(|| ConfigurationError::MissingCollaborator {
                collaborator: "rule evaluator".to_string(),
            })?;
        let resolver = self
            .resolver
            .ok_or_else(|| ConfigurationError::MissingCollaborator {
                collaborator: "test reference resolver".to_string(),
            })?;

        let backend = Runner::create_backend(&self.transports, &self.config.target)?;
        let escalation = self.config.effective_escalation();
        let connection = Connection::new(backend, &escalation);
        let escalated = connection.wrapper().is_some();
        let facade = ResourceFacade::new(connection, Arc::new(self.resources));

        log_success!(codes::success::RUNNER_CONFIGURED, "Runner configured",
            "backend" => &self.config.target.backend,
            "escalation" => escalated,
            "resources" => facade.resource_types().len()
        );

        Ok(Runner {
            config: self.config,
            facade,
            compiler: RuleCompiler::new(evaluator),
            resolver,
            registry: TestSuiteRegistry::new(),
            state: RunnerState::Configured,
        })
    }
}
