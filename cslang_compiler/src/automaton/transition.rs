use super::operation::RegisterOperation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Edge taken when an event with a matching name satisfies every guard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub event: String,
    /// Captured argument must equal the register's current value
    pub matches: Vec<RegisterOperation>,
    pub target: usize,
}

impl Transition {
    pub fn new(event: impl Into<String>, target: usize) -> Self {
        Self {
            event: event.into(),
            matches: Vec::new(),
            target,
        }
    }

    pub fn with_match(mut self, operation: RegisterOperation) -> Self {
        self.matches.push(operation);
        self
    }

    pub fn is_guarded(&self) -> bool {
        !self.matches.is_empty()
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.event)?;
        if self.is_guarded() {
            let guards: Vec<String> = self.matches.iter().map(|m| m.to_string()).collect();
            write!(f, " [{}]", guards.join(", "))?;
        }
        write!(f, " -> {}", self.target)
    }
}
