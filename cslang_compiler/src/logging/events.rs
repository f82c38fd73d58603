//! Log events emitted by the compiler and the monitor runtime

use super::codes::{self, Code};
use crate::utils::Span;
use std::collections::BTreeMap;
use std::time::SystemTime;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// One structured log record
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: SystemTime,
    pub level: LogLevel,
    pub code: Code,
    pub message: String,
    pub span: Option<Span>,
    /// Ordered so rendered context is stable across runs
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    fn new(level: LogLevel, code: Code, message: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level,
            code,
            message: truncate_message(message),
            span: None,
            context: BTreeMap::new(),
        }
    }

    pub fn error(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Error, code, message)
    }

    pub fn warning(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Warning, code, message)
    }

    /// Info without a specific code
    pub fn info(message: &str) -> Self {
        Self::new(LogLevel::Info, Code::new("I000"), message)
    }

    /// Info carrying a success code
    pub fn success(code: Code, message: &str) -> Self {
        Self::new(LogLevel::Info, code, message)
    }

    pub fn debug(message: &str) -> Self {
        Self::new(LogLevel::Debug, Code::new("D000"), message)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == LogLevel::Error
    }

    pub fn is_warning(&self) -> bool {
        self.level == LogLevel::Warning
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.code.as_str())
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.code.as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.code.as_str())
    }

    /// Single-line rendering used by the console logger
    pub fn format(&self) -> String {
        let span_str = self
            .span
            .as_ref()
            .map(|s| format!(" at {}", s.start()))
            .unwrap_or_default();

        let context_str = if self.context.is_empty() {
            String::new()
        } else {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            format!(" ({})", pairs.join(", "))
        };

        format!(
            "[{}] {} - {}{}{}",
            self.level.as_str(),
            self.code.as_str(),
            self.message,
            span_str,
            context_str
        )
    }

    /// Multi-line rendering including registry metadata
    pub fn format_detailed(&self) -> String {
        let mut output = self.format();

        output.push_str(&format!("\n  Category: {}", self.category()));
        output.push_str(&format!("\n  Severity: {}", self.severity()));

        if self.is_error() {
            output.push_str(&format!(
                "\n  Recoverable: {}",
                codes::is_recoverable(self.code.as_str())
            ));
        }

        let action = codes::get_action(self.code.as_str());
        if action != "No specific action available" && action != "None" {
            output.push_str(&format!("\n  Recommended action: {}", action));
        }

        output
    }

    /// JSON rendering for structured logging
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        let timestamp = self
            .timestamp
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let mut json = serde_json::json!({
            "timestamp_ms": timestamp,
            "level": self.level.as_str(),
            "code": self.code.as_str(),
            "message": self.message,
            "category": self.category(),
            "severity": self.severity(),
        });

        if self.is_error() {
            json["error_metadata"] = serde_json::json!({
                "recoverable": codes::is_recoverable(self.code.as_str()),
                "requires_halt": self.requires_halt(),
                "description": codes::get_description(self.code.as_str()),
            });
        }

        if let Some(span) = &self.span {
            json["span"] = serde_json::json!({
                "start_line": span.start().line,
                "start_column": span.start().column,
                "end_line": span.end().line,
                "end_column": span.end().column,
            });
        }

        if !self.context.is_empty() {
            json["context"] = serde_json::to_value(&self.context)?;
        }

        serde_json::to_string(&json)
    }
}

fn truncate_message(message: &str) -> String {
    let limit = crate::config::compile_time::logging::MAX_LOG_MESSAGE_LENGTH;
    if message.len() <= limit {
        return message.to_string();
    }

    let mut end = limit;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &message[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_error_event_metadata() {
        let event = LogEvent::error(
            codes::specification::CAPTURE_AFTER_PREAMBLE,
            "Found capture statement after preamble processing has ended",
        );

        assert!(event.is_error());
        assert_eq!(event.code.as_str(), "E060");
        assert_eq!(event.category(), "Specification");
        assert!(event.requires_halt());
    }

    #[test]
    fn test_format_includes_span_and_context() {
        let event = LogEvent::warning(codes::specification::UNBOUND_PARAMETER, "Unbound")
            .with_span(Span::point(Position::new(5, 2, 3)))
            .with_context("register", "fd")
            .with_context("event", "close");

        let formatted = event.format();
        assert_eq!(
            formatted,
            "[WARN] W064 - Unbound at 2:3 (event=close, register=fd)"
        );
    }

    #[test]
    fn test_detailed_format() {
        let event = LogEvent::error(codes::automaton::UNDEFINED_REGISTER, "Register unset");
        let detailed = event.format_detailed();

        assert!(detailed.contains("Category: Automaton"));
        assert!(detailed.contains("Recoverable: true"));
        assert!(detailed.contains("Recommended action:"));
    }

    #[test]
    fn test_json_formatting() {
        let event = LogEvent::error(codes::adapter::ARGUMENT_OUT_OF_RANGE, "Out of range")
            .with_context("event", "open");

        let json: serde_json::Value = serde_json::from_str(&event.format_json().unwrap()).unwrap();
        assert_eq!(json["level"], "ERROR");
        assert_eq!(json["code"], "E110");
        assert_eq!(json["context"]["event"], "open");
        assert_eq!(json["error_metadata"]["recoverable"], true);
    }

    #[test]
    fn test_success_is_info_level() {
        let event = LogEvent::success(codes::success::COMPILATION_COMPLETE, "done");
        assert_eq!(event.level, LogLevel::Info);
        assert!(!event.is_error());
    }
}
