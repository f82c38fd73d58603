use super::lookup::LookupError;
use cslang_compiler::logging::{codes, Code};

/// A guard or entry operation cannot be evaluated against a dataword
///
/// Every variant names the state being left or entered, the operation and
/// the dataword's event, which is enough to tell a malformed specification
/// from a malformed trace.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("State '{state}', {operation}, event '{event}': {source}")]
    LookupFailed {
        state: String,
        operation: String,
        event: String,
        #[source]
        source: LookupError,
    },

    #[error("State '{state}', {operation}, event '{event}': parameter has no declared capture")]
    UnboundArgument {
        state: String,
        operation: String,
        event: String,
    },

    #[error("State '{state}', {operation}, event '{event}': register '{register}' was never written")]
    UndefinedRegister {
        state: String,
        operation: String,
        event: String,
        register: String,
    },
}

impl MatchError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::LookupFailed { source, .. } => source.error_code(),
            Self::UnboundArgument { .. } => codes::automaton::UNBOUND_ARGUMENT,
            Self::UndefinedRegister { .. } => codes::automaton::UNDEFINED_REGISTER,
        }
    }

    pub fn state(&self) -> &str {
        match self {
            Self::LookupFailed { state, .. }
            | Self::UnboundArgument { state, .. }
            | Self::UndefinedRegister { state, .. } => state,
        }
    }

    pub fn event(&self) -> &str {
        match self {
            Self::LookupFailed { event, .. }
            | Self::UnboundArgument { event, .. }
            | Self::UndefinedRegister { event, .. } => event,
        }
    }
}
