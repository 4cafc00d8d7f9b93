//! Event codes for runner logging

/// Code attached to error and success events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub mod error {
    use super::Code;

    // Configuration (E1xx)
    pub const UNKNOWN_BACKEND: Code = Code::new("E100");
    pub const CONNECTION_FAILED: Code = Code::new("E101");
    pub const COMMAND_FAILED: Code = Code::new("E110");

    // Compilation (E2xx)
    pub const CONTENT_EVALUATION_FAILED: Code = Code::new("E200");
    pub const RESOLUTION_FAILED: Code = Code::new("E210");

    // Execution (E3xx)
    pub const EXAMPLE_ERRORED: Code = Code::new("E300");
}

pub mod success {
    use super::Code;

    pub const RUNNER_CONFIGURED: Code = Code::new("S100");
    pub const CONTENT_COMPILED: Code = Code::new("S200");
    pub const RUN_COMPLETED: Code = Code::new("S300");
}

/// Human readable description for a code string
pub fn get_description(code: &str) -> &'static str {
    match code {
        "E100" => "Requested backend is not registered",
        "E101" => "Backend connection could not be established",
        "E110" => "Command dispatch to the backend failed",
        "E200" => "Rule content could not be evaluated",
        "E210" => "Test reference could not be resolved",
        "E300" => "Example raised an error while executing",
        "S100" => "Runner configured",
        "S200" => "Content unit compiled",
        "S300" => "Run completed",
        _ => "Unknown code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_code_has_description() {
        let codes = [
            error::UNKNOWN_BACKEND,
            error::CONNECTION_FAILED,
            error::COMMAND_FAILED,
            error::CONTENT_EVALUATION_FAILED,
            error::RESOLUTION_FAILED,
            error::EXAMPLE_ERRORED,
            success::RUNNER_CONFIGURED,
            success::CONTENT_COMPILED,
            success::RUN_COMPLETED,
        ];
        for code in codes {
            assert_ne!(get_description(code.as_str()), "Unknown code", "{}", code);
        }
        assert_eq!(get_description("X999"), "Unknown code");
    }
}
