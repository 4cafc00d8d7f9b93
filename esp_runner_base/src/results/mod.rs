//! # Run Results
//!
//! Outcome types produced by the execution engine. Every outcome carries the
//! rule id of the group it came from so callers can map results back to
//! rules. All types serialize to JSON.

pub mod outcome;
pub mod result_set;

pub use outcome::{ExampleOutcome, GroupOutcome, OutcomeStatus};
pub use result_set::{ResultSet, Summary};
