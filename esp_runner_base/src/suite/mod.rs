//! Compiled check groups and the ordered registry that holds them

pub mod group;
pub mod propagation;
pub mod registry;

pub use group::{CheckGroup, Example, ExampleBody, ExampleNode, Metadata};
pub use propagation::propagate_rule_id;
pub use registry::TestSuiteRegistry;
