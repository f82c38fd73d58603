//! Buffered token sequence with lookahead for the statement parser

use crate::tokens::token::Token;
use crate::utils::{Span, Spanned};

/// A token with span information
pub type SpannedToken = Spanned<Token>;

/// Token sequence terminated by `Token::Eof`
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<SpannedToken>,
    position: usize,
}

impl TokenStream {
    /// Build a stream; an `Eof` token is appended if the input lacks one
    pub fn new(mut tokens: Vec<SpannedToken>) -> Self {
        if !matches!(tokens.last(), Some(t) if t.value == Token::Eof) {
            let span = tokens
                .last()
                .map(|t| Span::point(t.span.end))
                .unwrap_or_default();
            tokens.push(Spanned::new(Token::Eof, span));
        }

        Self {
            tokens,
            position: 0,
        }
    }

    /// Current token; stays on `Eof` once reached
    pub fn current(&self) -> &SpannedToken {
        let last = self.tokens.len() - 1;
        &self.tokens[self.position.min(last)]
    }

    pub fn current_token(&self) -> &Token {
        &self.current().value
    }

    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Token `n` positions after the current one
    pub fn peek_ahead(&self, n: usize) -> &SpannedToken {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + n).min(last)]
    }

    /// Consume and return the current token
    pub fn advance(&mut self) -> SpannedToken {
        let token = self.current().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    pub fn is_at_end(&self) -> bool {
        self.current_token() == &Token::Eof
    }

    /// Number of tokens including the terminating `Eof`
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.len() <= 1
    }

    pub fn tokens(&self) -> &[SpannedToken] {
        &self.tokens
    }
}
