//! Code-tagged logging for the runner
//!
//! Events are rendered as `[CODE] message key=value ...` and forwarded to the
//! `log` facade under the `esp_runner` target. Binaries choose the backend
//! (the SDK CLI installs `env_logger`).

pub mod codes;
#[macro_use]
pub mod macros;

pub use codes::Code;
pub use log::Level;

/// Log target shared by every runner event
pub const LOG_TARGET: &str = "esp_runner";

/// Render an event line without emitting it
pub fn format_event(code: Option<Code>, message: &str, context: &[(&str, String)]) -> String {
    let mut line = String::with_capacity(message.len() + 16 * context.len());

    if let Some(code) = code {
        line.push('[');
        line.push_str(code.as_str());
        line.push_str("] ");
    }
    line.push_str(message);

    for (key, value) in context {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        if value.contains(char::is_whitespace) {
            line.push_str(&format!("{:?}", value));
        } else {
            line.push_str(value);
        }
    }

    line
}

/// Emit an event through the `log` facade
pub fn emit(level: Level, code: Option<Code>, message: &str, context: &[(&str, String)]) {
    if !log::log_enabled!(target: LOG_TARGET, level) {
        return;
    }
    let line = format_event(code, message, context);
    log::log!(target: LOG_TARGET, level, "{}", line);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_event_with_code_and_context() {
        let line = format_event(
            Some(codes::error::COMMAND_FAILED),
            "Command failed",
            &[("backend", "local".to_string()), ("exit", "1".to_string())],
        );
        assert_eq!(line, "[E110] Command failed backend=local exit=1");
    }

    #[test]
    fn test_format_event_quotes_values_with_spaces() {
        let line = format_event(None, "Dispatching", &[("command", "cat /etc/shadow".to_string())]);
        assert_eq!(line, "Dispatching command=\"cat /etc/shadow\"");
    }
}
