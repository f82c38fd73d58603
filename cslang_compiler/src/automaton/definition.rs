use super::state::State;
use super::transition::Transition;
use crate::logging::{codes, Code};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the synthetic state at index 0
pub const START_STATE_NAME: &str = "start";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("Automaton has no states")]
    NoStates,

    #[error("No state at index {index}")]
    UnknownState { index: usize },

    #[error("Transition on '{event}' from state {from} targets missing state {target}")]
    DanglingTransition {
        from: usize,
        event: String,
        target: usize,
    },
}

impl DefinitionError {
    pub fn error_code(&self) -> Code {
        codes::artifact::INVALID_DEFINITION
    }
}

/// Compiled states, transitions and pre-seeded registers
///
/// Index 0 is always the start state. The definition is immutable once the
/// compiler hands it over; a runtime instance copies the register seeds into
/// its own bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonDefinition {
    pub states: Vec<State>,
    pub registers: BTreeMap<String, String>,
}

impl AutomatonDefinition {
    pub fn new() -> Self {
        Self {
            states: vec![State::new(START_STATE_NAME)],
            registers: BTreeMap::new(),
        }
    }

    /// Append a state and return its index
    pub fn push_state(&mut self, state: State) -> usize {
        self.states.push(state);
        self.states.len() - 1
    }

    pub fn add_transition(
        &mut self,
        from: usize,
        transition: Transition,
    ) -> Result<(), DefinitionError> {
        if transition.target >= self.states.len() {
            return Err(DefinitionError::DanglingTransition {
                from,
                event: transition.event,
                target: transition.target,
            });
        }

        self.states
            .get_mut(from)
            .ok_or(DefinitionError::UnknownState { index: from })?
            .add_transition(transition);
        Ok(())
    }

    /// Set a register's initial value, replacing any earlier seed
    pub fn seed_register(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.registers.insert(name.into(), value.into());
    }

    pub fn state(&self, index: usize) -> Option<&State> {
        self.states.get(index)
    }

    pub fn state_mut(&mut self, index: usize) -> Option<&mut State> {
        self.states.get_mut(index)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn last_index(&self) -> usize {
        self.states.len().saturating_sub(1)
    }

    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    pub fn accepting_states(&self) -> impl Iterator<Item = usize> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, state)| state.accepting)
            .map(|(index, _)| index)
    }

    /// Distinct register names, seeded or referenced by any operation
    pub fn register_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .registers
            .keys()
            .map(String::as_str)
            .chain(self.states.iter().flat_map(State::referenced_registers))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Check that the start state exists and every transition target is a
    /// state index
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.states.is_empty() {
            return Err(DefinitionError::NoStates);
        }

        for (from, state) in self.states.iter().enumerate() {
            if let Some(transition) = state
                .transitions
                .iter()
                .find(|t| t.target >= self.states.len())
            {
                return Err(DefinitionError::DanglingTransition {
                    from,
                    event: transition.event.clone(),
                    target: transition.target,
                });
            }
        }
        Ok(())
    }
}

impl Default for AutomatonDefinition {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AutomatonDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Automaton: {} states, {} transitions",
            self.state_count(),
            self.transition_count()
        )?;
        if !self.registers.is_empty() {
            writeln!(f, "  Registers:")?;
            for (name, value) in &self.registers {
                writeln!(f, "    {} <- \"{}\"", name, value)?;
            }
        }
        for (index, state) in self.states.iter().enumerate() {
            writeln!(f, "  [{}] {}", index, state)?;
        }
        Ok(())
    }
}
