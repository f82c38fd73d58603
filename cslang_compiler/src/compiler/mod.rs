//! Statement reduction into a preamble and an automaton definition

pub mod context;
pub mod error;

pub use context::{CompilationWarning, CompilerContext, CompilerMode};
pub use error::SpecificationError;
