//! Check model
//!
//! Rules hold checks; a check is a description (resource handles and labels)
//! plus a body of examples and nested groups. The Rule Compiler turns checks
//! into [`CheckGroup`](crate::suite::CheckGroup)s for execution.

pub mod assertion;
pub mod matchers;
pub mod model;

pub use assertion::{Assertion, AssertionError, CustomCheck, Expectation, Subject};
pub use matchers::{Matcher, MatcherError};
pub use model::{BodyItem, Check, CheckBody, DescriptionArg, Rule};
