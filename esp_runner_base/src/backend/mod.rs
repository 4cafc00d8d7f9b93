//! Backend connections to the system under test
//!
//! The runner never talks to a target directly. A [`TransportRegistry`] turns
//! a [`TargetConfig`](crate::config::TargetConfig) into a [`Backend`], and a
//! [`Connection`] binds that backend to the session's command wrapper so that
//! every command issued by a resource goes through escalation.

pub mod connection;
pub mod errors;
pub mod local;
pub mod mock;
pub mod traits;
pub mod transport;

pub use connection::Connection;
pub use errors::CommandError;
pub use local::{LocalBackend, LocalTransport};
pub use mock::{MockBackend, MockTransport};
pub use traits::{Backend, CommandOutput, OsFamily, OsInfo};
pub use transport::{TransportFactory, TransportRegistry};
