use cslang_compiler::logging::{codes, Code};

/// A raw event does not fit the preamble declared for its name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    #[error("Capture '{capture}' of '{event}' reads argument {index}, but the event has {available}")]
    ArgumentOutOfRange {
        event: String,
        capture: String,
        index: usize,
        available: usize,
    },

    #[error("Capture '{capture}' of '{event}' reads the return value, but the event has none")]
    MissingReturnValue { event: String, capture: String },

    #[error("Predicate on '{event}' tests '{argument}', which is not captured")]
    PredicateArgumentMissing { event: String, argument: String },
}

impl AdapterError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::ArgumentOutOfRange { .. } => codes::adapter::ARGUMENT_OUT_OF_RANGE,
            Self::MissingReturnValue { .. } => codes::adapter::MISSING_RETURN_VALUE,
            Self::PredicateArgumentMissing { .. } => codes::adapter::PREDICATE_ARGUMENT_MISSING,
        }
    }

    pub fn event(&self) -> &str {
        match self {
            Self::ArgumentOutOfRange { event, .. }
            | Self::MissingReturnValue { event, .. }
            | Self::PredicateArgumentMissing { event, .. } => event,
        }
    }
}
