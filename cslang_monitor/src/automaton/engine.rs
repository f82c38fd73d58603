//! Register automaton execution
//!
//! `match_dataword` resolves every guard and entry operation before touching
//! any state, so a failing lookup leaves the automaton, its registers and the
//! dataword exactly as they were.

use super::error::MatchError;
use super::lookup::find_captured_index;
use super::registers::RegisterBank;
use crate::types::Dataword;
use cslang_compiler::automaton::{
    AutomatonDefinition, DefinitionError, RegisterOperation, State, Transition,
};
use cslang_compiler::log_debug;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Transitioned { from: usize, to: usize },
    /// No transition fired; the current state is unchanged
    Ignored,
}

impl MatchOutcome {
    pub fn is_transition(&self) -> bool {
        matches!(self, MatchOutcome::Transitioned { .. })
    }
}

/// Effects of entering a state, computed before any of them is applied
#[derive(Default)]
struct EntryEffects {
    stores: Vec<(String, String)>,
    writes: Vec<(usize, String)>,
}

/// One running instance of a compiled automaton
///
/// Callers serialize access; independent instances share nothing but the
/// immutable definition.
#[derive(Debug, Clone)]
pub struct RegisterAutomaton {
    definition: Arc<AutomatonDefinition>,
    current_state: usize,
    registers: RegisterBank,
}

impl RegisterAutomaton {
    pub fn new(definition: AutomatonDefinition) -> Result<Self, DefinitionError> {
        Self::from_shared(Arc::new(definition))
    }

    pub fn from_shared(definition: Arc<AutomatonDefinition>) -> Result<Self, DefinitionError> {
        definition.validate()?;
        let registers = RegisterBank::seeded(&definition.registers);
        Ok(Self {
            definition,
            current_state: 0,
            registers,
        })
    }

    pub fn definition(&self) -> &AutomatonDefinition {
        &self.definition
    }

    pub fn current_state(&self) -> usize {
        self.current_state
    }

    pub fn current_state_name(&self) -> &str {
        &self.current().name
    }

    pub fn registers(&self) -> &RegisterBank {
        &self.registers
    }

    pub fn is_accepting(&self) -> bool {
        self.current().accepting
    }

    /// Back to the start state with only the pre-seeded registers
    pub fn reset(&mut self) {
        self.current_state = 0;
        self.registers = RegisterBank::seeded(&self.definition.registers);
    }

    /// Take the first transition of the current state that accepts the
    /// dataword, then run the target state's stores and writes
    pub fn match_dataword(&mut self, dataword: &mut Dataword) -> Result<MatchOutcome, MatchError> {
        let from = self.current_state;
        let state = self.current();

        let mut fired = None;
        for transition in &state.transitions {
            if transition.event == dataword.name && self.guards_hold(state, transition, dataword)? {
                fired = Some(transition.target);
                break;
            }
        }

        let Some(target) = fired else {
            log_debug!("Event ignored",
                "state" => &state.name,
                "event" => &dataword.name
            );
            return Ok(MatchOutcome::Ignored);
        };

        let effects = self.plan_entry(target, dataword)?;

        for (register, value) in effects.stores {
            self.registers.set(register, value);
        }
        for (index, value) in effects.writes {
            dataword.captured_arguments[index].overwrite(value);
        }
        self.current_state = target;

        log_debug!("Transition taken",
            "from" => from,
            "to" => target,
            "event" => &dataword.name
        );
        Ok(MatchOutcome::Transitioned { from, to: target })
    }

    /// State at `current_state`; the index is valid because the definition
    /// was validated and only transition targets are ever assigned
    fn current(&self) -> &State {
        &self.definition.states[self.current_state]
    }

    fn guards_hold(
        &self,
        state: &State,
        transition: &Transition,
        dataword: &Dataword,
    ) -> Result<bool, MatchError> {
        for guard in &transition.matches {
            let operation = format!("match {} on '{}'", guard, transition.event);
            let index = resolve_argument(state, &operation, guard, dataword)?;
            let register = self
                .registers
                .get(&guard.register)
                .ok_or_else(|| undefined_register(state, &operation, guard, dataword))?;

            if dataword.captured_arguments[index].value != register {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn plan_entry(&self, target: usize, dataword: &Dataword) -> Result<EntryEffects, MatchError> {
        let state = &self.definition.states[target];
        if !state.has_entry_effects() {
            return Ok(EntryEffects::default());
        }

        let mut stores: Vec<(String, String)> = Vec::with_capacity(state.stores.len());
        for store in &state.stores {
            let operation = format!("store {}", store);
            let index = resolve_argument(state, &operation, store, dataword)?;
            stores.push((
                store.register.clone(),
                dataword.captured_arguments[index].value.clone(),
            ));
        }

        // Writes see the registers as they will be after this entry's stores
        let mut writes = Vec::with_capacity(state.writes.len());
        for write in &state.writes {
            let operation = format!("write {}", write);
            let index = resolve_argument(state, &operation, write, dataword)?;
            let value = stores
                .iter()
                .rev()
                .find(|(register, _)| *register == write.register)
                .map(|(_, value)| value.clone())
                .or_else(|| self.registers.get(&write.register).map(str::to_string))
                .ok_or_else(|| undefined_register(state, &operation, write, dataword))?;
            writes.push((index, value));
        }

        Ok(EntryEffects { stores, writes })
    }
}

fn resolve_argument(
    state: &State,
    operation: &str,
    register_operation: &RegisterOperation,
    dataword: &Dataword,
) -> Result<usize, MatchError> {
    let name = register_operation
        .argument_name()
        .ok_or_else(|| MatchError::UnboundArgument {
            state: state.name.clone(),
            operation: operation.to_string(),
            event: dataword.name.clone(),
        })?;

    find_captured_index(dataword, name).map_err(|source| MatchError::LookupFailed {
        state: state.name.clone(),
        operation: operation.to_string(),
        event: dataword.name.clone(),
        source,
    })
}

fn undefined_register(
    state: &State,
    operation: &str,
    register_operation: &RegisterOperation,
    dataword: &Dataword,
) -> MatchError {
    MatchError::UndefinedRegister {
        state: state.name.clone(),
        operation: operation.to_string(),
        event: dataword.name.clone(),
        register: register_operation.register.clone(),
    }
}
