use crate::automaton::DefinitionError;
use crate::compiler::SpecificationError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::syntax::SyntaxError;
use crate::utils::Span;

/// Compilation failure from any phase; no partial output survives it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("Lexical analysis failed: {0}")]
    Lexical(#[from] LexerError),

    #[error("Syntax analysis failed: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Specification error: {0}")]
    Specification(#[from] SpecificationError),
}

impl CompileError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Lexical(error) => error.error_code(),
            Self::Syntax(error) => error.error_code(),
            Self::Specification(error) => error.error_code(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexical(error) => Some(error.span()),
            Self::Syntax(error) => error.span(),
            Self::Specification(error) => error.span(),
        }
    }

    /// Message without the phase prefix
    pub fn detail(&self) -> String {
        match self {
            Self::Lexical(error) => error.to_string(),
            Self::Syntax(error) => error.to_string(),
            Self::Specification(error) => error.to_string(),
        }
    }
}

/// JSON dump/restore failure for a compiled specification
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to serialize compiled specification: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("Failed to deserialize compiled specification: {0}")]
    Deserialization(#[source] serde_json::Error),

    #[error("Compiled specification is inconsistent: {0}")]
    InvalidDefinition(#[from] DefinitionError),
}

impl ArtifactError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Serialization(_) => codes::artifact::SERIALIZATION_FAILED,
            Self::Deserialization(_) => codes::artifact::DESERIALIZATION_FAILED,
            Self::InvalidDefinition(error) => error.error_code(),
        }
    }
}
