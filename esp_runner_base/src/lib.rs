//! # ESP Runner Base
//!
//! Compliance check execution core: privilege-escalating command wrapper,
//! backend connections, resource facade, rule compiler, test suite registry,
//! execution engine and the [`Runner`](api::Runner) tying them together.

#[macro_use]
pub mod logging;

pub mod api;
pub mod backend;
pub mod checks;
pub mod compiler;
pub mod config;
pub mod escalation;
pub mod execution;
pub mod resources;
pub mod results;
pub mod suite;

// Convenience re-exports
pub use api::*;
pub use config::{ConfigurationError, RunnerConfig, TargetConfig};

pub mod prelude {
    pub use crate::api::{
        ResolveError, ResolvedContent, Runner, RunnerBuilder, RunnerError, RunnerState,
        StaticResolver, TargetResolver,
    };

    pub use crate::backend::{
        Backend, CommandError, CommandOutput, Connection, LocalBackend, MockBackend,
        MockTransport, OsFamily, OsInfo, TransportFactory, TransportRegistry,
    };

    pub use crate::checks::{
        Assertion, BodyItem, Check, CheckBody, DescriptionArg, Expectation, Matcher, Rule,
        Subject,
    };

    pub use crate::compiler::{
        CompilationError, EvaluationError, ProfileContext, RuleCompiler, RuleEvaluator,
    };

    pub use crate::config::{ConfigurationError, RunnerConfig, TargetConfig};
    pub use crate::escalation::{CommandWrapper, EscalationConfig};
    pub use crate::execution::{ExecutionEngine, OutputFormat, Reporter};

    pub use crate::resources::{
        Resource, ResourceError, ResourceFacade, ResourceFactory, ResourceRegistry,
    };

    pub use crate::results::{ExampleOutcome, GroupOutcome, OutcomeStatus, ResultSet, Summary};
    pub use crate::suite::{propagate_rule_id, CheckGroup, TestSuiteRegistry};
}
