//! Session configuration for a runner

use super::errors::ConfigurationError;
use super::target::TargetConfig;
use crate::escalation::EscalationConfig;
use crate::execution::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete configuration for one runner session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Profile the compiled rules belong to
    pub profile_id: Option<String>,

    /// System under test
    pub target: TargetConfig,

    /// Privilege escalation for every backend command
    pub escalation: EscalationConfig,

    /// Reporter name, passed through to the execution engine
    pub format: String,

    /// Stop adding content after the first unit that fails to compile
    pub fail_fast: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            profile_id: None,
            target: TargetConfig::default(),
            escalation: EscalationConfig::default(),
            format: OutputFormat::default().as_str().to_string(),
            fail_fast: true,
        }
    }
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(content).map_err(|e| ConfigurationError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Load a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigurationError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigurationError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Apply `ESP_RUNNER_*` environment overrides
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(format) = lookup(env_vars::FORMAT) {
            self.format = format;
        }
        if let Some(sudo) = lookup(env_vars::SUDO).and_then(|v| v.parse().ok()) {
            self.escalation.sudo = sudo;
        }
        if let Some(options) = lookup(env_vars::SUDO_OPTIONS) {
            self.escalation.sudo_options = Some(options);
        }
        if let Some(timeout) = lookup(env_vars::COMMAND_TIMEOUT).and_then(|v| v.parse().ok()) {
            self.target.command_timeout_secs = timeout;
        }
        self
    }

    pub fn with_profile_id(mut self, profile_id: impl Into<String>) -> Self {
        self.profile_id = Some(profile_id.into());
        self
    }

    pub fn with_target(mut self, target: TargetConfig) -> Self {
        self.target = target;
        self
    }

    pub fn with_escalation(mut self, escalation: EscalationConfig) -> Self {
        self.escalation = escalation;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Escalation settings with the target's login user as fallback
    pub fn effective_escalation(&self) -> EscalationConfig {
        self.escalation
            .clone()
            .with_fallback_user(self.target.user.clone())
    }

    /// Reporter selected by `format`, falling back to `progress`
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_name(&self.format).unwrap_or_else(|| {
            log_warning!(
                "Unknown output format, using progress",
                "format" => &self.format
            );
            OutputFormat::Progress
        })
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    pub const FORMAT: &str = "ESP_RUNNER_FORMAT";
    pub const SUDO: &str = "ESP_RUNNER_SUDO";
    pub const SUDO_OPTIONS: &str = "ESP_RUNNER_SUDO_OPTIONS";
    pub const COMMAND_TIMEOUT: &str = "ESP_RUNNER_COMMAND_TIMEOUT";
    pub const LOG_LEVEL: &str = "ESP_RUNNER_LOG_LEVEL";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.format, "progress");
        assert_eq!(config.target.backend, "local");
        assert!(!config.escalation.sudo);
        assert!(config.fail_fast);
    }

    #[test]
    fn test_from_toml() {
        let config = RunnerConfig::from_toml_str(
            r#"
            profile_id = "linux-baseline"
            format = "documentation"

            [target]
            backend = "mock"
            user = "admin"

            [escalation]
            sudo = true
            sudo_options = "-H"
            "#,
        )
        .unwrap();

        assert_eq!(config.profile_id.as_deref(), Some("linux-baseline"));
        assert_eq!(config.output_format(), OutputFormat::Documentation);
        assert_eq!(config.target.backend, "mock");
        assert_eq!(config.target.command_timeout_secs, 30);
        assert!(config.escalation.sudo);
        assert_eq!(config.escalation.sudo_options.as_deref(), Some("-H"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "format = \"json\"").unwrap();

        let config = RunnerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.output_format(), OutputFormat::Json);

        assert!(matches!(
            RunnerConfig::from_file("/nonexistent/runner.toml"),
            Err(ConfigurationError::Io { .. })
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            RunnerConfig::from_toml_str("format = "),
            Err(ConfigurationError::Parse { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (env_vars::FORMAT, "json"),
            (env_vars::SUDO, "true"),
            (env_vars::SUDO_OPTIONS, "-n"),
            (env_vars::COMMAND_TIMEOUT, "5"),
        ]
        .into_iter()
        .collect();

        let config =
            RunnerConfig::new().with_overrides_from(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.format, "json");
        assert!(config.escalation.sudo);
        assert_eq!(config.escalation.sudo_options.as_deref(), Some("-n"));
        assert_eq!(config.target.command_timeout_secs, 5);
    }

    #[test]
    fn test_unknown_format_falls_back_to_progress() {
        let config = RunnerConfig::new().with_format("junit");
        assert_eq!(config.format, "junit");
        assert_eq!(config.output_format(), OutputFormat::Progress);
    }

    #[test]
    fn test_effective_escalation_inherits_login_user() {
        let config = RunnerConfig::new()
            .with_target(TargetConfig::local().with_user("root"))
            .with_escalation(EscalationConfig::new().with_sudo());
        assert!(config.effective_escalation().targets_root());
    }
}
