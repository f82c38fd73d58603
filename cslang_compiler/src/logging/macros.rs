//! Logging macros taking a `Code` plus `"key" => value` context pairs.
//! Context values may be any `Display` type.

/// Log an error with a code, optional span and context
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::error($code, $message), None, vec![])
    };

    ($code:expr, $message:expr, span = $span:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::error($code, $message), Some($span), vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::error($code, $message), None, context_strings)
        }
    };

    ($code:expr, $message:expr, span = $span:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::error($code, $message), Some($span), context_strings)
        }
    };
}

/// Log a warning with a code, optional span and context
#[macro_export]
macro_rules! log_warning {
    ($code:expr, $message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::warning($code, $message), None, vec![])
    };

    ($code:expr, $message:expr, span = $span:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::warning($code, $message), Some($span), context_strings)
        }
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::warning($code, $message), None, context_strings)
        }
    };
}

/// Log a success code with context
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::success($code, $message), None, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::success($code, $message), None, context_strings)
        }
    };
}

/// Log an informational message
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::info($message), None, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::info($message), None, context_strings)
        }
    };
}

/// Log a debug message; context is only formatted when debug output is enabled
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::debug($message), None, vec![])
        }
    };

    ($message:expr, $($key:expr => $value:expr),+) => {
        if $crate::logging::debug_enabled() {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::debug($message), None, context_strings)
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;
    use crate::utils::{Position, Span};

    #[test]
    fn test_macros_accept_display_context() {
        let span = Span::point(Position::start());
        let position: usize = 3;

        // No global logger installed in unit tests: all calls are no-ops
        log_error!(codes::syntax::UNEXPECTED_TOKEN, "Unexpected token");
        log_error!(codes::syntax::UNEXPECTED_TOKEN, "Unexpected token", span = span);
        log_error!(codes::syntax::UNEXPECTED_TOKEN, "Unexpected token",
            span = span,
            "found" => "==",
            "position" => position
        );
        log_warning!(codes::specification::UNBOUND_PARAMETER, "Unbound parameter",
            "register" => "fd",
            "position" => position
        );
        log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenized",
            "tokens" => 12
        );
        log_info!("Compiling", "statements" => 4);
        log_debug!("Reducing statement", "index" => 0);
    }
}
