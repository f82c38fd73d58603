//! Lexical analysis for specification source
//!
//! `Tokenizer` yields spanned tokens lazily; `LexicalAnalyzer` collects them
//! into an `Eof`-terminated `TokenStream` for the parser.

pub mod analyzer;

pub use analyzer::{LexerError, LexicalAnalyzer, LexicalMetrics, Tokenizer};

use crate::config::runtime::LexicalPreferences;
use crate::tokens::TokenStream;

/// Tokenize with the environment-derived lexical preferences
pub fn tokenize(source: &str) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::new().tokenize(source)
}

pub fn tokenize_with_preferences(
    source: &str,
    preferences: LexicalPreferences,
) -> Result<TokenStream, LexerError> {
    LexicalAnalyzer::with_preferences(preferences).tokenize(source)
}
