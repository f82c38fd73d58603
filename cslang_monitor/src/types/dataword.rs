use super::event::RawEvent;
use cslang_compiler::ArgumentPosition;
use serde::{Deserialize, Serialize};

/// A value taken from a raw event under a declared capture name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedArgument {
    pub name: String,
    pub position: ArgumentPosition,
    pub value: String,
    /// Set once a register write has replaced `value`
    #[serde(default)]
    pub rewritten: bool,
}

impl CapturedArgument {
    pub fn new(name: impl Into<String>, position: ArgumentPosition, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position,
            value: value.into(),
            rewritten: false,
        }
    }

    /// Replace the value with a register's content
    pub fn overwrite(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.rewritten = true;
    }
}

/// An event adapted for matching
///
/// Captured arguments follow the preamble's declaration order for the event.
/// A dataword with no captured arguments is uninteresting: it can still take
/// unguarded transitions by name, but no register operation can reference
/// it. Register writes modify `captured_arguments` in place; the raw event is
/// kept untouched so the rewrite can be rendered against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataword {
    pub name: String,
    pub captured_arguments: Vec<CapturedArgument>,
    pub predicate_results: Vec<bool>,
    pub original: RawEvent,
}

impl Dataword {
    pub fn new(
        original: RawEvent,
        captured_arguments: Vec<CapturedArgument>,
        predicate_results: Vec<bool>,
    ) -> Self {
        Self {
            name: original.name.clone(),
            captured_arguments,
            predicate_results,
            original,
        }
    }

    pub fn uninteresting(original: RawEvent) -> Self {
        Self::new(original, Vec::new(), Vec::new())
    }

    pub fn is_uninteresting(&self) -> bool {
        self.captured_arguments.is_empty()
    }

    pub fn predicates_hold(&self) -> bool {
        self.predicate_results.iter().all(|&result| result)
    }

    /// `[T]`/`[F]` per predicate, then `name(captured values)`
    pub fn summary(&self) -> String {
        let flags: String = self
            .predicate_results
            .iter()
            .map(|&result| if result { "[T]" } else { "[F]" })
            .collect();
        let values: Vec<&str> = self
            .captured_arguments
            .iter()
            .map(|argument| argument.value.as_str())
            .collect();

        format!("{}{}({})", flags, self.name, values.join(", "))
    }

    /// The raw event with every register-written value put back at its
    /// source position
    pub fn rewritten_event(&self) -> RawEvent {
        let mut event = self.original.clone();
        // Several captures may read one position; only written ones go back
        for argument in self.captured_arguments.iter().filter(|a| a.rewritten) {
            match argument.position {
                ArgumentPosition::Index(index) => {
                    if let Some(slot) = event.arguments.get_mut(index) {
                        slot.clone_from(&argument.value);
                    }
                }
                ArgumentPosition::Return => {
                    event.return_value = Some(argument.value.clone());
                }
            }
        }
        event
    }

    /// Trace line for the rewritten event
    pub fn render_event(&self) -> String {
        self.rewritten_event().to_string()
    }

    pub fn was_rewritten(&self) -> bool {
        self.rewritten_event() != self.original
    }
}
