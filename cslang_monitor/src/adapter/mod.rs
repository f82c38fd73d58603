//! Raw event to dataword adaptation driven by the preamble

mod error;

pub use error::AdapterError;

use crate::types::{CapturedArgument, Dataword, RawEvent};
use cslang_compiler::log_debug;
use cslang_compiler::preamble::{ArgumentPosition, CaptureSpec, Preamble};
use std::sync::Arc;

/// Applies declared captures and predicates to raw events
///
/// The preamble is shared read-only; several adapters (one per monitored
/// session) can hold the same one.
#[derive(Debug, Clone)]
pub struct EventAdapter {
    preamble: Arc<Preamble>,
}

impl EventAdapter {
    pub fn new(preamble: Arc<Preamble>) -> Self {
        Self { preamble }
    }

    pub fn preamble(&self) -> &Preamble {
        &self.preamble
    }

    pub fn handle_event(&self, event: &RawEvent) -> Result<Dataword, AdapterError> {
        let captures = self.preamble.captures_for(&event.name);
        if captures.is_empty() {
            log_debug!("Uninteresting event", "event" => &event.name);
            return Ok(Dataword::uninteresting(event.clone()));
        }

        let captured_arguments = captures
            .iter()
            .map(|capture| capture_argument(event, capture))
            .collect::<Result<Vec<_>, _>>()?;

        let predicate_results = self
            .preamble
            .predicates_for(&event.name)
            .iter()
            .map(|predicate| {
                captured_arguments
                    .iter()
                    .find(|argument| argument.name == predicate.arg_name)
                    .map(|argument| predicate.evaluate(&argument.value))
                    .ok_or_else(|| AdapterError::PredicateArgumentMissing {
                        event: event.name.clone(),
                        argument: predicate.arg_name.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Dataword::new(
            event.clone(),
            captured_arguments,
            predicate_results,
        ))
    }
}

fn capture_argument(event: &RawEvent, capture: &CaptureSpec) -> Result<CapturedArgument, AdapterError> {
    let value = match capture.position {
        ArgumentPosition::Index(index) => event.arguments.get(index).ok_or_else(|| {
            AdapterError::ArgumentOutOfRange {
                event: event.name.clone(),
                capture: capture.arg_name.clone(),
                index,
                available: event.arguments.len(),
            }
        })?,
        ArgumentPosition::Return => {
            event
                .return_value
                .as_ref()
                .ok_or_else(|| AdapterError::MissingReturnValue {
                    event: event.name.clone(),
                    capture: capture.arg_name.clone(),
                })?
        }
    };

    Ok(CapturedArgument::new(
        capture.arg_name.clone(),
        capture.position,
        value.clone(),
    ))
}
