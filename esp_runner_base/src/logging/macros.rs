//! Logging macros accepting `"key" => value` context pairs
//!
//! Context values only need `Display`.

/// Log error with a `Code`
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::emit($crate::logging::Level::Error, Some($code), $message, &[])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
        $crate::logging::emit($crate::logging::Level::Error, Some($code), $message, &context)
    }};
}

/// Log success with a `Code`
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::emit($crate::logging::Level::Info, Some($code), $message, &[])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
        $crate::logging::emit($crate::logging::Level::Info, Some($code), $message, &context)
    }};
}

/// Log warning message
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        $crate::logging::emit($crate::logging::Level::Warn, None, $message, &[])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
        $crate::logging::emit($crate::logging::Level::Warn, None, $message, &context)
    }};
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::emit($crate::logging::Level::Info, None, $message, &[])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
        $crate::logging::emit($crate::logging::Level::Info, None, $message, &context)
    }};
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        $crate::logging::emit($crate::logging::Level::Debug, None, $message, &[])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
        $crate::logging::emit($crate::logging::Level::Debug, None, $message, &context)
    }};
}
