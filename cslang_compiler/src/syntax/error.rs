//! Grammar errors raised while reducing tokens to statements

use crate::logging::{codes, Code};
use crate::utils::Span;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// A token sequence that no production accepts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unexpected token: expected {expected}, found {found} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of input: expected {expected} at {span}")]
    UnexpectedEndOfInput { expected: String, span: Span },

    #[error("Empty program: a specification needs at least one statement")]
    EmptyProgram,

    #[error("Invalid argument position '{text}' at {span}")]
    InvalidPosition { text: String, span: Span },

    #[error("Limit exceeded: {what} ({count} > {max}) at {span}")]
    LimitExceeded {
        what: &'static str,
        count: usize,
        max: usize,
        span: Span,
    },
}

impl SyntaxError {
    pub fn unexpected_token(expected: &str, found: &str, span: Span) -> Self {
        Self::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
            span,
        }
    }

    pub fn unexpected_end_of_input(expected: &str, span: Span) -> Self {
        Self::UnexpectedEndOfInput {
            expected: expected.to_string(),
            span,
        }
    }

    pub fn invalid_position(text: &str, span: Span) -> Self {
        Self::InvalidPosition {
            text: text.to_string(),
            span,
        }
    }

    pub fn limit_exceeded(what: &'static str, count: usize, max: usize, span: Span) -> Self {
        Self::LimitExceeded {
            what,
            count,
            max,
            span,
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::UnexpectedEndOfInput { .. } => codes::syntax::UNEXPECTED_END_OF_INPUT,
            Self::EmptyProgram => codes::syntax::EMPTY_PROGRAM,
            Self::InvalidPosition { .. } => codes::syntax::INVALID_POSITION,
            Self::LimitExceeded { .. } => codes::syntax::LIMIT_EXCEEDED,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnexpectedEndOfInput { span, .. }
            | Self::InvalidPosition { span, .. }
            | Self::LimitExceeded { span, .. } => Some(*span),
            Self::EmptyProgram => None,
        }
    }

    pub fn recommended_action(&self) -> &'static str {
        codes::get_action(self.error_code().as_str())
    }

    /// Error message followed by the registry's recommended action
    pub fn enhanced_message(&self) -> String {
        format!("{}. {}", self, self.recommended_action())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    #[test]
    fn test_error_codes_and_spans() {
        let span = Span::point(Position::new(4, 1, 5));

        let error = SyntaxError::unexpected_token("';'", "'=='", span);
        assert_eq!(error.error_code(), codes::syntax::UNEXPECTED_TOKEN);
        assert_eq!(error.span(), Some(span));
        assert_eq!(
            error.to_string(),
            "Unexpected token: expected ';', found '==' at 1:5-5"
        );

        assert_eq!(SyntaxError::EmptyProgram.span(), None);
        assert_eq!(
            SyntaxError::invalid_position("99999999999999999999999", span).error_code(),
            codes::syntax::INVALID_POSITION
        );
    }

    #[test]
    fn test_enhanced_message_appends_action() {
        let error = SyntaxError::EmptyProgram;
        assert!(error.enhanced_message().starts_with("Empty program"));
        assert!(error.enhanced_message().len() > error.to_string().len());
    }
}
