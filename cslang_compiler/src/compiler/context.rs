//! Statement reduction state
//!
//! `CompilerContext` is threaded through every reduction step. It starts in
//! preamble mode; the first register assignment or event pattern switches it
//! to automaton mode for good.

use super::error::SpecificationError;
use crate::automaton::{AutomatonDefinition, RegisterOperation, State, Transition};
use crate::config::compile_time::automaton::*;
use crate::config::compile_time::syntax::MAX_ERROR_HISTORY;
use crate::config::runtime::CompilerPreferences;
use crate::grammar::ast::*;
use crate::logging::codes;
use crate::preamble::Preamble;
use crate::utils::Span;
use crate::{log_debug, log_warning};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompilerMode {
    Preamble,
    Automaton,
}

/// Non-fatal finding recorded during compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationWarning {
    pub code: String,
    pub message: String,
    pub span: Option<Span>,
}

pub struct CompilerContext {
    mode: CompilerMode,
    preamble: Preamble,
    automaton: AutomatonDefinition,
    previous_state: usize,
    preferences: CompilerPreferences,
    warnings: Vec<CompilationWarning>,
    statements_reduced: usize,
}

impl CompilerContext {
    pub fn new(preferences: CompilerPreferences) -> Self {
        Self {
            mode: CompilerMode::Preamble,
            preamble: Preamble::new(),
            automaton: AutomatonDefinition::new(),
            previous_state: 0,
            preferences,
            warnings: Vec::new(),
            statements_reduced: 0,
        }
    }

    pub fn mode(&self) -> CompilerMode {
        self.mode
    }

    pub fn preamble(&self) -> &Preamble {
        &self.preamble
    }

    pub fn automaton(&self) -> &AutomatonDefinition {
        &self.automaton
    }

    /// Index of the state the next event pattern transitions from
    pub fn previous_state(&self) -> usize {
        self.previous_state
    }

    pub fn warnings(&self) -> &[CompilationWarning] {
        &self.warnings
    }

    pub fn statements_reduced(&self) -> usize {
        self.statements_reduced
    }

    /// Apply one statement to the preamble or the automaton
    pub fn reduce(&mut self, statement: &Statement) -> Result<(), SpecificationError> {
        match statement {
            Statement::Capture(capture) => self.declare_capture(capture)?,
            Statement::Predicate(predicate) => self.declare_predicate(predicate)?,
            Statement::Assignment(assignment) => self.assign_register(assignment)?,
            Statement::Pattern(pattern) => self.append_pattern(pattern)?,
        }
        self.statements_reduced += 1;
        Ok(())
    }

    /// Hand over the compiled preamble, automaton and warnings
    pub fn finish(mut self) -> (Preamble, AutomatonDefinition, Vec<CompilationWarning>) {
        if self.preferences.accept_final_state && self.previous_state > 0 {
            if let Some(state) = self.automaton.state_mut(self.previous_state) {
                state.accepting = true;
            }
        }
        (self.preamble, self.automaton, self.warnings)
    }

    fn declare_capture(&mut self, capture: &CaptureDeclaration) -> Result<(), SpecificationError> {
        if self.mode != CompilerMode::Preamble {
            return Err(SpecificationError::CaptureAfterPreamble {
                event: capture.event.clone(),
                span: capture.span,
            });
        }

        self.preamble
            .add_capture(&capture.event, &capture.binding, capture.position);
        Ok(())
    }

    fn declare_predicate(
        &mut self,
        predicate: &PredicateDeclaration,
    ) -> Result<(), SpecificationError> {
        if self.mode != CompilerMode::Preamble {
            return Err(SpecificationError::PredicateAfterPreamble {
                event: predicate.event.clone(),
                span: predicate.span,
            });
        }

        self.preamble
            .add_predicate(&predicate.event, &predicate.binding, &predicate.expected);
        Ok(())
    }

    fn assign_register(&mut self, assignment: &RegisterAssignment) -> Result<(), SpecificationError> {
        self.close_preamble();

        let is_new = !self.automaton.registers.contains_key(&assignment.register);
        if is_new && self.automaton.registers.len() >= MAX_REGISTERS {
            return Err(SpecificationError::TooManyRegisters {
                count: self.automaton.registers.len() + 1,
                max: MAX_REGISTERS,
                span: assignment.span,
            });
        }

        self.automaton
            .seed_register(&assignment.register, &assignment.value);
        Ok(())
    }

    /// New state for the event, reached from the previous state
    fn append_pattern(&mut self, pattern: &EventPattern) -> Result<(), SpecificationError> {
        self.close_preamble();

        if self.automaton.state_count() >= MAX_STATES {
            return Err(SpecificationError::TooManyStates {
                count: self.automaton.state_count() + 1,
                max: MAX_STATES,
                span: pattern.span,
            });
        }

        let target = self.automaton.state_count();
        let mut state = State::new(&pattern.event);
        let mut transition = Transition::new(&pattern.event, target);

        for (position, parameter) in pattern.parameters_of(ParameterKind::Read) {
            let operation = self.bind_parameter(&pattern.event, position, parameter);
            transition.matches.push(operation);
        }
        for (position, parameter) in pattern.parameters_of(ParameterKind::Write) {
            let operation = self.bind_parameter(&pattern.event, position, parameter);
            state.stores.push(operation);
        }

        let index = self.automaton.push_state(state);
        self.automaton
            .add_transition(self.previous_state, transition)?;

        log_debug!("Appended state",
            "state" => &pattern.event,
            "index" => index,
            "from" => self.previous_state
        );
        self.previous_state = index;
        Ok(())
    }

    /// Resolve a parameter position to the captured-argument name declared in
    /// the same capture slot. Without a declared slot the parameter's own name
    /// is used as the argument name.
    fn bind_parameter(
        &mut self,
        event: &str,
        position: usize,
        parameter: &Parameter,
    ) -> RegisterOperation {
        if let Some(argument) = self.preamble.binding_at(event, position) {
            return RegisterOperation::bound(position, argument, &parameter.name);
        }

        if self.preferences.warn_unbound_positions {
            let message = format!(
                "Parameter {}{} of '{}' has no declared capture at position {}; matching argument '{}' by name",
                parameter.kind, parameter.name, event, position, parameter.name
            );
            log_warning!(codes::specification::UNBOUND_PARAMETER, &message,
                span = parameter.span.unwrap_or_default(),
                "event" => event,
                "position" => position,
                "register" => &parameter.name
            );
            if self.warnings.len() < MAX_ERROR_HISTORY {
                self.warnings.push(CompilationWarning {
                    code: codes::specification::UNBOUND_PARAMETER.to_string(),
                    message,
                    span: parameter.span,
                });
            }
        }

        RegisterOperation::bound(position, &parameter.name, &parameter.name)
    }

    fn close_preamble(&mut self) {
        if self.mode == CompilerMode::Preamble {
            self.mode = CompilerMode::Automaton;
            log_debug!("Preamble closed",
                "captures" => self.preamble.capture_count(),
                "predicates" => self.preamble.predicate_count()
            );
        }
    }
}
