//! Token system for specification source
//!
//! The tokenizer emits only significant tokens: whitespace and comments are
//! dropped during scanning, so the stream the parser sees is exactly the
//! statement grammar's terminals followed by `Eof`.

pub mod token;
pub mod token_stream;

pub use token::{classify_word, Token, TokenClass};
pub use token_stream::{SpannedToken, TokenStream};

pub use crate::utils::{Position, Span, Spanned};
