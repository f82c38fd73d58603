use super::operation::RegisterOperation;
use super::transition::Transition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Automaton node with its entry effects
///
/// On entry, `stores` copy captured arguments into registers, then `writes`
/// overwrite captured arguments with register values. Outgoing transitions
/// are tried in order and the first that fires wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    pub transitions: Vec<Transition>,
    pub accepting: bool,
    pub stores: Vec<RegisterOperation>,
    pub writes: Vec<RegisterOperation>,
}

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transitions: Vec::new(),
            accepting: false,
            stores: Vec::new(),
            writes: Vec::new(),
        }
    }

    pub fn accepting(mut self, accepting: bool) -> Self {
        self.accepting = accepting;
        self
    }

    pub fn with_store(mut self, operation: RegisterOperation) -> Self {
        self.stores.push(operation);
        self
    }

    pub fn with_write(mut self, operation: RegisterOperation) -> Self {
        self.writes.push(operation);
        self
    }

    pub fn add_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub fn has_entry_effects(&self) -> bool {
        !self.stores.is_empty() || !self.writes.is_empty()
    }

    /// Every register this state reads, stores or writes
    pub fn referenced_registers(&self) -> impl Iterator<Item = &str> {
        self.transitions
            .iter()
            .flat_map(|t| t.matches.iter())
            .chain(self.stores.iter())
            .chain(self.writes.iter())
            .map(|op| op.register.as_str())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.accepting {
            write!(f, " (accepting)")?;
        }
        for store in &self.stores {
            write!(f, "\n      store {}", store)?;
        }
        for op in &self.writes {
            write!(f, "\n      write {}", op)?;
        }
        for transition in &self.transitions {
            write!(f, "\n      on {}", transition)?;
        }
        Ok(())
    }
}
