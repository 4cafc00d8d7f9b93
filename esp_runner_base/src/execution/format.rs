//! Output format names

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reporter selection, by configuration name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Progress,
    Documentation,
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [
        OutputFormat::Progress,
        OutputFormat::Documentation,
        OutputFormat::Json,
    ];

    /// Look up a format by name; `doc` is accepted for documentation
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "progress" => Some(OutputFormat::Progress),
            "documentation" | "doc" => Some(OutputFormat::Documentation),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Progress => "progress",
            OutputFormat::Documentation => "documentation",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
