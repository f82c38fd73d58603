//! Errors raised while reducing statements into the preamble and automaton

use crate::automaton::DefinitionError;
use crate::logging::{codes, Code};
use crate::utils::Span;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecificationError {
    #[error("Found capture statement for '{event}' after preamble processing has ended")]
    CaptureAfterPreamble { event: String, span: Option<Span> },

    #[error("Found predicate statement for '{event}' after preamble processing has ended")]
    PredicateAfterPreamble { event: String, span: Option<Span> },

    #[error("Too many states: {count} (max {max})")]
    TooManyStates {
        count: usize,
        max: usize,
        span: Option<Span>,
    },

    #[error("Too many registers: {count} (max {max})")]
    TooManyRegisters {
        count: usize,
        max: usize,
        span: Option<Span>,
    },

    #[error("Automaton construction failed: {0}")]
    Construction(#[from] DefinitionError),
}

impl SpecificationError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::CaptureAfterPreamble { .. } => codes::specification::CAPTURE_AFTER_PREAMBLE,
            Self::PredicateAfterPreamble { .. } => codes::specification::PREDICATE_AFTER_PREAMBLE,
            Self::TooManyStates { .. } => codes::specification::TOO_MANY_STATES,
            Self::TooManyRegisters { .. } => codes::specification::TOO_MANY_REGISTERS,
            Self::Construction(error) => error.error_code(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::CaptureAfterPreamble { span, .. }
            | Self::PredicateAfterPreamble { span, .. }
            | Self::TooManyStates { span, .. }
            | Self::TooManyRegisters { span, .. } => *span,
            Self::Construction(_) => None,
        }
    }

    /// Capture or predicate declared after the first pattern or assignment
    pub fn is_phase_order_error(&self) -> bool {
        matches!(
            self,
            Self::CaptureAfterPreamble { .. } | Self::PredicateAfterPreamble { .. }
        )
    }
}
