//! Resource accessor facade and registry
//!
//! Resource types are registered once as [`ResourceFactory`] implementations.
//! The [`ResourceFacade`] looks them up by type id and binds every new
//! instance to the session's [`Connection`](crate::backend::Connection), so
//! resources only ever run commands through the escalation wrapper.

pub mod errors;
pub mod facade;
pub mod registry;
pub mod traits;

pub use errors::ResourceError;
pub use facade::ResourceFacade;
pub use registry::ResourceRegistry;
pub use traits::{Resource, ResourceFactory};
