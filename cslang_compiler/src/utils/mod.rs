//! Shared primitive types used by the tokenizer, parser and diagnostics.

pub mod span;

pub use span::{Position, SourceMap, Span, Spanned};
