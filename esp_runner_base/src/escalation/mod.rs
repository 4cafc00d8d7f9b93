//! Privilege escalation for backend commands
//!
//! A [`CommandWrapper`] decides, once per session, which prefix every command
//! receives before it is handed to the backend.

pub mod config;
pub mod wrapper;

pub use config::EscalationConfig;
pub use wrapper::{build_prefix, CommandWrapper, ESCALATION_COMMAND, ROOT_USER};
