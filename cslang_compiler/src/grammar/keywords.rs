//! Reserved words of the specification language
use serde::{Deserialize, Serialize};

/// Reserved words; these can never be used as event, register or binding names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Capture,
    Predicate,
    As,
    Ret,
}

impl Keyword {
    pub const ALL: [Keyword; 4] = [
        Keyword::Capture,
        Keyword::Predicate,
        Keyword::As,
        Keyword::Ret,
    ];

    /// Exact spelling in specification source
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Capture => "capture",
            Self::Predicate => "predicate",
            Self::As => "as",
            Self::Ret => "ret",
        }
    }

    /// Keyword for a word, if it is reserved. Matching is case-sensitive.
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|keyword| keyword.as_str() == word)
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
