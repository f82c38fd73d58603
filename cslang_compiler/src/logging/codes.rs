//! Error, warning and success codes with their classification metadata
//!
//! Every phase of the compiler and the monitor runtime reports through one of
//! the code groups below. Metadata lives in a single static table so the
//! classification helpers and the code constants cannot drift apart.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Code wrapper shared by error, warning and success events
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

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E023");
    pub const STRING_TOO_LARGE: Code = Code::new("E024");
    pub const COMMENT_TOO_LONG: Code = Code::new("E026");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
}

pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_END_OF_INPUT: Code = Code::new("E040");
    pub const EMPTY_PROGRAM: Code = Code::new("E041");
    pub const INVALID_POSITION: Code = Code::new("E045");
    pub const LIMIT_EXCEEDED: Code = Code::new("E046");
    pub const UNEXPECTED_TOKEN: Code = Code::new("E050");
}

/// Statement ordering and automaton construction
pub mod specification {
    use super::Code;

    pub const CAPTURE_AFTER_PREAMBLE: Code = Code::new("E060");
    pub const PREDICATE_AFTER_PREAMBLE: Code = Code::new("E061");
    pub const TOO_MANY_STATES: Code = Code::new("E062");
    pub const TOO_MANY_REGISTERS: Code = Code::new("E063");
    pub const UNBOUND_PARAMETER: Code = Code::new("W064");
}

pub mod artifact {
    use super::Code;

    pub const SERIALIZATION_FAILED: Code = Code::new("E070");
    pub const DESERIALIZATION_FAILED: Code = Code::new("E071");
    pub const INVALID_DEFINITION: Code = Code::new("E072");
}

/// Register automaton runtime
pub mod automaton {
    use super::Code;

    pub const CAPTURED_ARGUMENT_NOT_FOUND: Code = Code::new("E100");
    pub const AMBIGUOUS_CAPTURED_ARGUMENT: Code = Code::new("E101");
    pub const UNBOUND_ARGUMENT: Code = Code::new("E102");
    pub const UNDEFINED_REGISTER: Code = Code::new("E103");
    pub const EVENT_SKIPPED: Code = Code::new("W104");
}

/// Raw event to dataword adaptation
pub mod adapter {
    use super::Code;

    pub const ARGUMENT_OUT_OF_RANGE: Code = Code::new("E110");
    pub const MISSING_RETURN_VALUE: Code = Code::new("E111");
    pub const PREDICATE_ARGUMENT_MISSING: Code = Code::new("E112");
}

pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const PARSING_COMPLETE: Code = Code::new("I040");
    pub const COMPILATION_COMPLETE: Code = Code::new("I060");
    pub const ARTIFACT_EXPORTED: Code = Code::new("I070");
    pub const ARTIFACT_IMPORTED: Code = Code::new("I071");
    pub const TRANSITION_TAKEN: Code = Code::new("I100");
    pub const SESSION_STARTED: Code = Code::new("I101");
    pub const SESSION_ACCEPTED: Code = Code::new("I102");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

const METADATA: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Critical internal error",
        "File a bug report with the specification that triggered it",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        true,
        "Logging or configuration initialization failed",
        "Check CSLANG_* environment variables and the build profile",
    ),
    // Lexical
    ErrorMetadata::new(
        "E020",
        "Lexical",
        Severity::High,
        false,
        true,
        "Unrecognized character in strict lexing mode",
        "Remove the character or disable strict lexing",
    ),
    ErrorMetadata::new(
        "E021",
        "Lexical",
        Severity::High,
        false,
        true,
        "Quoted string literal is missing its closing quote",
        "Add the closing double quote",
    ),
    ErrorMetadata::new(
        "E023",
        "Lexical",
        Severity::Medium,
        false,
        true,
        "Identifier exceeds the configured maximum length",
        "Shorten the event, register or binding name",
    ),
    ErrorMetadata::new(
        "E024",
        "Lexical",
        Severity::Medium,
        false,
        true,
        "String literal exceeds the configured maximum size",
        "Shorten the literal or raise max_string_size in the build profile",
    ),
    ErrorMetadata::new(
        "E026",
        "Lexical",
        Severity::Low,
        false,
        true,
        "Comment exceeds the configured maximum length",
        "Split the comment over several lines",
    ),
    ErrorMetadata::new(
        "E027",
        "Lexical",
        Severity::High,
        false,
        true,
        "Specification produces more tokens than allowed",
        "Split the specification or raise max_token_count",
    ),
    // Syntax
    ErrorMetadata::new(
        "E040",
        "Syntax",
        Severity::High,
        false,
        true,
        "Specification ended in the middle of a statement",
        "Complete the statement and terminate it with ';'",
    ),
    ErrorMetadata::new(
        "E041",
        "Syntax",
        Severity::High,
        false,
        true,
        "Specification contains no statements",
        "Add at least one statement",
    ),
    ErrorMetadata::new(
        "E045",
        "Syntax",
        Severity::High,
        false,
        true,
        "Capture position is not a valid argument index",
        "Use a non-negative argument index or 'ret'",
    ),
    ErrorMetadata::new(
        "E046",
        "Syntax",
        Severity::Medium,
        false,
        true,
        "Statement or parameter count exceeds the configured limit",
        "Split the specification or raise the syntax limits",
    ),
    ErrorMetadata::new(
        "E050",
        "Syntax",
        Severity::High,
        false,
        true,
        "Token does not fit the statement grammar",
        "Check the statement against the capture/predicate/assignment/event forms",
    ),
    // Specification
    ErrorMetadata::new(
        "E060",
        "Specification",
        Severity::High,
        false,
        true,
        "Capture declared after the preamble was closed",
        "Move all capture statements before the first event pattern or register assignment",
    ),
    ErrorMetadata::new(
        "E061",
        "Specification",
        Severity::High,
        false,
        true,
        "Predicate declared after the preamble was closed",
        "Move all predicate statements before the first event pattern or register assignment",
    ),
    ErrorMetadata::new(
        "E062",
        "Specification",
        Severity::Medium,
        false,
        true,
        "Automaton exceeds the configured number of states",
        "Reduce the number of event patterns or raise max_states",
    ),
    ErrorMetadata::new(
        "E063",
        "Specification",
        Severity::Medium,
        false,
        true,
        "Automaton exceeds the configured number of registers",
        "Reduce the number of registers or raise max_registers",
    ),
    ErrorMetadata::new(
        "W064",
        "Specification",
        Severity::Low,
        true,
        false,
        "Register parameter has no matching capture declaration",
        "Declare a capture for this event at the parameter's position",
    ),
    // Artifact
    ErrorMetadata::new(
        "E070",
        "Artifact",
        Severity::Medium,
        true,
        false,
        "Compiled specification could not be serialized",
        "Report the specification that failed to serialize",
    ),
    ErrorMetadata::new(
        "E071",
        "Artifact",
        Severity::Medium,
        true,
        false,
        "Compiled specification document is malformed",
        "Recompile the specification to regenerate the artifact",
    ),
    ErrorMetadata::new(
        "E072",
        "Artifact",
        Severity::High,
        false,
        true,
        "Automaton definition references a state that does not exist",
        "Recompile the specification instead of editing the artifact by hand",
    ),
    // Automaton runtime
    ErrorMetadata::new(
        "E100",
        "Automaton",
        Severity::High,
        true,
        false,
        "Dataword has no captured argument with the referenced name",
        "Check the capture declarations against the event source",
    ),
    ErrorMetadata::new(
        "E101",
        "Automaton",
        Severity::High,
        true,
        false,
        "Dataword has several captured arguments with the referenced name",
        "Give each capture of an event a distinct binding name",
    ),
    ErrorMetadata::new(
        "E102",
        "Automaton",
        Severity::High,
        true,
        false,
        "Register operation has no bound argument name",
        "Declare a capture for the event at the parameter's position",
    ),
    ErrorMetadata::new(
        "E103",
        "Automaton",
        Severity::High,
        true,
        false,
        "Register read before any value was stored in it",
        "Pre-seed the register or store into it on an earlier event",
    ),
    ErrorMetadata::new(
        "W104",
        "Automaton",
        Severity::Low,
        true,
        false,
        "Event skipped after a runtime lookup failure",
        "Inspect the trace around the skipped event",
    ),
    // Adapter
    ErrorMetadata::new(
        "E110",
        "Adapter",
        Severity::Medium,
        true,
        false,
        "Capture position is beyond the event's argument list",
        "Check the capture position against the traced event's arity",
    ),
    ErrorMetadata::new(
        "E111",
        "Adapter",
        Severity::Medium,
        true,
        false,
        "Return value captured for an event that has none",
        "Only capture 'ret' on completed events",
    ),
    ErrorMetadata::new(
        "E112",
        "Adapter",
        Severity::Medium,
        true,
        false,
        "Predicate references an argument that is not captured",
        "Declare a capture with the predicate's binding name",
    ),
    // Success
    ErrorMetadata::new(
        "I004",
        "System",
        Severity::Low,
        true,
        false,
        "Logging system initialized",
        "None",
    ),
    ErrorMetadata::new(
        "I020",
        "Lexical",
        Severity::Low,
        true,
        false,
        "Tokenization completed",
        "None",
    ),
    ErrorMetadata::new(
        "I040",
        "Syntax",
        Severity::Low,
        true,
        false,
        "All statements parsed",
        "None",
    ),
    ErrorMetadata::new(
        "I060",
        "Specification",
        Severity::Low,
        true,
        false,
        "Specification compiled into preamble and automaton",
        "None",
    ),
    ErrorMetadata::new(
        "I070",
        "Artifact",
        Severity::Low,
        true,
        false,
        "Compiled specification serialized",
        "None",
    ),
    ErrorMetadata::new(
        "I071",
        "Artifact",
        Severity::Low,
        true,
        false,
        "Compiled specification restored",
        "None",
    ),
    ErrorMetadata::new(
        "I100",
        "Automaton",
        Severity::Low,
        true,
        false,
        "Transition fired",
        "None",
    ),
    ErrorMetadata::new(
        "I101",
        "Automaton",
        Severity::Low,
        true,
        false,
        "Monitor session started",
        "None",
    ),
    ErrorMetadata::new(
        "I102",
        "Automaton",
        Severity::Low,
        true,
        false,
        "Monitor session reached an accepting state",
        "None",
    ),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| METADATA.iter().map(|meta| (meta.code, meta)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code).copied()
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_has_metadata() {
        let all = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            lexical::INVALID_CHARACTER,
            lexical::UNTERMINATED_STRING,
            lexical::IDENTIFIER_TOO_LONG,
            lexical::STRING_TOO_LARGE,
            lexical::COMMENT_TOO_LONG,
            lexical::TOO_MANY_TOKENS,
            syntax::UNEXPECTED_END_OF_INPUT,
            syntax::EMPTY_PROGRAM,
            syntax::INVALID_POSITION,
            syntax::LIMIT_EXCEEDED,
            syntax::UNEXPECTED_TOKEN,
            specification::CAPTURE_AFTER_PREAMBLE,
            specification::PREDICATE_AFTER_PREAMBLE,
            specification::TOO_MANY_STATES,
            specification::TOO_MANY_REGISTERS,
            specification::UNBOUND_PARAMETER,
            artifact::SERIALIZATION_FAILED,
            artifact::DESERIALIZATION_FAILED,
            artifact::INVALID_DEFINITION,
            automaton::CAPTURED_ARGUMENT_NOT_FOUND,
            automaton::AMBIGUOUS_CAPTURED_ARGUMENT,
            automaton::UNBOUND_ARGUMENT,
            automaton::UNDEFINED_REGISTER,
            automaton::EVENT_SKIPPED,
            adapter::ARGUMENT_OUT_OF_RANGE,
            adapter::MISSING_RETURN_VALUE,
            adapter::PREDICATE_ARGUMENT_MISSING,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::TOKENIZATION_COMPLETE,
            success::PARSING_COMPLETE,
            success::COMPILATION_COMPLETE,
            success::ARTIFACT_EXPORTED,
            success::ARTIFACT_IMPORTED,
            success::TRANSITION_TAKEN,
            success::SESSION_STARTED,
            success::SESSION_ACCEPTED,
        ];

        for code in all {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
        assert_eq!(get_error_registry().len(), METADATA.len());
    }

    #[test]
    fn test_classification() {
        assert_eq!(
            get_category(specification::CAPTURE_AFTER_PREAMBLE.as_str()),
            "Specification"
        );
        assert!(requires_halt(syntax::UNEXPECTED_TOKEN.as_str()));
        assert!(is_recoverable(automaton::CAPTURED_ARGUMENT_NOT_FOUND.as_str()));
        assert_eq!(get_severity(system::INTERNAL_ERROR.as_str()), Severity::Critical);
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_category("Z999"), "Unknown");
        assert!(!requires_halt("Z999"));
    }
}
