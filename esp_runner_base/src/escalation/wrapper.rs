//! Command prefixing for privilege escalation
//!
//! When a password is configured it is never placed on the command line in
//! plaintext: the wrapper echoes a base64 encoding of `password + "\n"`,
//! decodes it on the target and pipes it into `sudo -S`. The encoded form is
//! still visible to anyone who can read the process list or the command log
//! of the target. This is an accepted weakness of the transport and the
//! reason [`CommandWrapper::redacted`] exists.

use super::config::EscalationConfig;
use crate::backend::OsInfo;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;

/// Escalation command placed in front of wrapped commands
pub const ESCALATION_COMMAND: &str = "sudo";

/// Account that never needs escalation
pub const ROOT_USER: &str = "root";

/// Prefixes commands for the session's escalation configuration
///
/// The prefix is computed once at construction; [`CommandWrapper::run`] only
/// concatenates.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandWrapper {
    prefix: String,
    encoded_password: Option<String>,
}

impl CommandWrapper {
    /// Build a wrapper regardless of the backend's capabilities
    pub fn new(config: &EscalationConfig) -> Self {
        let encoded_password = if config.is_requested() && !config.targets_root() {
            config.sudo_password.as_deref().map(encode_password)
        } else {
            None
        };

        Self {
            prefix: build_prefix(config),
            encoded_password,
        }
    }

    /// Build a wrapper only when escalation is active for this backend
    pub fn load(os: &OsInfo, config: &EscalationConfig) -> Option<Self> {
        if Self::is_active(config, os) {
            Some(Self::new(config))
        } else {
            None
        }
    }

    /// Escalation is requested and the target OS family supports `sudo`
    pub fn is_active(config: &EscalationConfig, os: &OsInfo) -> bool {
        config.is_requested() && os.is_unix()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Effective command sent to the backend
    pub fn run(&self, command: &str) -> String {
        let mut effective = String::with_capacity(self.prefix.len() + command.len());
        effective.push_str(&self.prefix);
        effective.push_str(command);
        effective
    }

    /// Effective command with the encoded password masked, for logs
    pub fn redacted(&self, command: &str) -> String {
        let effective = self.run(command);
        match &self.encoded_password {
            Some(encoded) => effective.replace(encoded.as_str(), "***"),
            None => effective,
        }
    }
}

impl fmt::Debug for CommandWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandWrapper")
            .field("prefix", &self.redacted(""))
            .finish()
    }
}

/// Prefix for a configuration
///
/// Empty when escalation is off or the user is already root. Otherwise
/// `sudo `, or the stdin password pipeline when a password is set, followed
/// by the configured options and a single space.
pub fn build_prefix(config: &EscalationConfig) -> String {
    if !config.is_requested() || config.targets_root() {
        return String::new();
    }

    let mut prefix = match &config.sudo_password {
        Some(password) => format!(
            "echo {} | base64 -d | {} -S ",
            encode_password(password),
            ESCALATION_COMMAND
        ),
        None => format!("{} ", ESCALATION_COMMAND),
    };

    if let Some(options) = &config.sudo_options {
        prefix.push_str(options);
        prefix.push(' ');
    }

    prefix
}

fn encode_password(password: &str) -> String {
    STANDARD.encode(format!("{}\n", password))
}
