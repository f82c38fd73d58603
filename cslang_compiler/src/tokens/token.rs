//! Token definitions for specification source
use crate::grammar::keywords::Keyword;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// `capture`, `predicate`, `as`, `ret`
    Keyword(Keyword),
    /// Event, register and binding names
    Identifier(String),
    /// Digits of an argument position, kept as text until the parser binds it
    Numeric(String),
    /// Text between double quotes, without the quotes
    StringLiteral(String),

    LeftParen,
    RightParen,
    /// `?` register read
    Read,
    /// `!` register store
    Write,
    /// `==`
    Equality,
    /// `<-`
    Assign,
    /// `,` including any whitespace after it
    ParamSeparator,
    /// `;`
    Terminator,

    Eof,
}

impl Token {
    /// Short description used in grammar error messages
    pub fn describe(&self) -> String {
        match self {
            Token::Keyword(k) => format!("keyword '{}'", k),
            Token::Identifier(name) => format!("identifier '{}'", name),
            Token::Numeric(text) => format!("number {}", text),
            Token::StringLiteral(text) => format!("string \"{}\"", text),
            Token::Eof => "end of input".to_string(),
            other => format!("'{}'", other),
        }
    }

    pub fn class(&self) -> TokenClass {
        match self {
            Token::Keyword(_) => TokenClass::Keyword,
            Token::Identifier(_) => TokenClass::Identifier,
            Token::Numeric(_) | Token::StringLiteral(_) => TokenClass::Literal,
            Token::Read | Token::Write | Token::Equality | Token::Assign => TokenClass::Operator,
            Token::LeftParen
            | Token::RightParen
            | Token::ParamSeparator
            | Token::Terminator => TokenClass::Punctuation,
            Token::Eof => TokenClass::Special,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Keyword(k) => write!(f, "{}", k),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Numeric(text) => write!(f, "{}", text),
            Token::StringLiteral(text) => write!(f, "\"{}\"", text),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Read => write!(f, "?"),
            Token::Write => write!(f, "!"),
            Token::Equality => write!(f, "=="),
            Token::Assign => write!(f, "<-"),
            Token::ParamSeparator => write!(f, ","),
            Token::Terminator => write!(f, ";"),
            Token::Eof => write!(f, "<eof>"),
        }
    }
}

/// Coarse token categories, used for lexical metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Keyword,
    Identifier,
    Literal,
    Operator,
    Punctuation,
    Special,
}

/// Classify a scanned word: reserved words win over identifiers
pub fn classify_word(word: &str) -> Token {
    match Keyword::from_word(word) {
        Some(keyword) => Token::Keyword(keyword),
        None => Token::Identifier(word.to_string()),
    }
}
