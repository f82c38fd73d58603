use serde::{Deserialize, Serialize};
use std::fmt;

/// A register guard, store or write tied to one event pattern parameter
///
/// `position` is the parameter's index in the pattern. `argument` is the
/// captured-argument name that index resolves to through the preamble; it is
/// `None` when the event declares no capture for that slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterOperation {
    pub position: usize,
    pub argument: Option<String>,
    pub register: String,
}

impl RegisterOperation {
    pub fn bound(position: usize, argument: impl Into<String>, register: impl Into<String>) -> Self {
        Self {
            position,
            argument: Some(argument.into()),
            register: register.into(),
        }
    }

    pub fn unbound(position: usize, register: impl Into<String>) -> Self {
        Self {
            position,
            argument: None,
            register: register.into(),
        }
    }

    pub fn argument_name(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    pub fn is_bound(&self) -> bool {
        self.argument.is_some()
    }
}

impl fmt::Display for RegisterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(argument) => write!(f, "{}#{} ~ {}", argument, self.position, self.register),
            None => write!(f, "<unbound>#{} ~ {}", self.position, self.register),
        }
    }
}
