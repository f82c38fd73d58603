// Internal modules
pub mod automaton;
pub mod compiler;
pub mod config;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod preamble;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use automaton::{AutomatonDefinition, RegisterOperation, State, Transition};
pub use pipeline::{
    compile_source, compile_source_with_config, ArtifactError, CompileError,
    CompiledSpecification,
};
pub use preamble::{ArgumentPosition, CaptureSpec, Preamble, PredicateSpec};
