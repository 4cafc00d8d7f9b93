//! Escalation configuration supplied by the caller

use serde::{Deserialize, Serialize};
use std::fmt;

/// Privilege escalation options for a runner session
///
/// Immutable once the runner is built. Inconsistent combinations (options
/// without `sudo`, a password without `sudo`) are accepted and simply have no
/// effect.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Whether commands should be escalated at all
    pub sudo: bool,

    /// Extra options placed after the escalation command
    pub sudo_options: Option<String>,

    /// Password fed to the escalation command over stdin
    #[serde(skip_serializing)]
    pub sudo_password: Option<String>,

    /// Account the session is logged in as; `root` needs no prefix
    pub user: Option<String>,
}

impl EscalationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable escalation
    pub fn with_sudo(mut self) -> Self {
        self.sudo = true;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.sudo_password = Some(password.into());
        self
    }

    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.sudo_options = Some(options.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Use `user` only when no user was configured explicitly
    pub fn with_fallback_user(mut self, user: Option<String>) -> Self {
        if self.user.is_none() {
            self.user = user;
        }
        self
    }

    /// Whether the caller asked for escalation
    pub fn is_requested(&self) -> bool {
        self.sudo
    }

    /// Whether the session already runs as root
    pub fn targets_root(&self) -> bool {
        self.user.as_deref() == Some(super::ROOT_USER)
    }
}

impl fmt::Debug for EscalationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EscalationConfig")
            .field("sudo", &self.sudo)
            .field("sudo_options", &self.sudo_options)
            .field(
                "sudo_password",
                &self.sudo_password.as_ref().map(|_| "<redacted>"),
            )
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let config = EscalationConfig::new().with_sudo().with_password("secr3t");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secr3t"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_password_not_serialized() {
        let config = EscalationConfig::new().with_sudo().with_password("secr3t");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secr3t"));
        assert!(!json.contains("sudo_password"));
    }

    #[test]
    fn test_fallback_user_only_fills_missing_user() {
        let explicit = EscalationConfig::new()
            .with_user("admin")
            .with_fallback_user(Some("root".to_string()));
        assert_eq!(explicit.user.as_deref(), Some("admin"));

        let inherited = EscalationConfig::new().with_fallback_user(Some("root".to_string()));
        assert!(inherited.targets_root());
    }
}
