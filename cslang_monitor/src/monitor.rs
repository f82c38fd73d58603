//! Monitor sessions
//!
//! A `Monitor` chains the event adapter and one automaton instance over a
//! stream of raw events. Each session has its own id, registers and
//! counters; the compiled preamble and definition are shared.

use crate::adapter::{AdapterError, EventAdapter};
use crate::automaton::{MatchError, MatchOutcome, RegisterAutomaton};
use crate::config::MonitorPreferences;
use crate::types::{Dataword, RawEvent};
use chrono::{DateTime, Utc};
use cslang_compiler::automaton::{AutomatonDefinition, DefinitionError};
use cslang_compiler::logging::{codes, Code};
use cslang_compiler::{log_debug, log_error, log_info, log_success, log_warning};
use cslang_compiler::{CompiledSpecification, Preamble};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonitorError {
    #[error("Event adaptation failed: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Matching failed: {0}")]
    Match(#[from] MatchError),

    #[error("Invalid automaton: {0}")]
    Definition(#[from] DefinitionError),
}

impl MonitorError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Adapter(e) => e.error_code(),
            Self::Match(e) => e.error_code(),
            Self::Definition(e) => e.error_code(),
        }
    }
}

/// Result of feeding one raw event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorStep {
    /// The adapted event after any register writes
    pub dataword: Dataword,
    pub outcome: MatchOutcome,
    pub accepting: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorStats {
    pub processed: usize,
    pub transitions: usize,
    pub ignored: usize,
    /// Events dropped because a register operation could not be evaluated
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct Monitor {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    adapter: EventAdapter,
    automaton: RegisterAutomaton,
    preferences: MonitorPreferences,
    stats: MonitorStats,
}

impl Monitor {
    pub fn new(specification: &CompiledSpecification) -> Result<Self, MonitorError> {
        Self::from_parts(
            Arc::new(specification.preamble.clone()),
            Arc::new(specification.automaton.clone()),
            MonitorPreferences::default(),
        )
    }

    /// Start a session over shared compiled parts
    pub fn from_parts(
        preamble: Arc<Preamble>,
        definition: Arc<AutomatonDefinition>,
        preferences: MonitorPreferences,
    ) -> Result<Self, MonitorError> {
        let automaton = RegisterAutomaton::from_shared(definition)?;
        let monitor = Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            adapter: EventAdapter::new(preamble),
            automaton,
            preferences,
            stats: MonitorStats::default(),
        };

        log_success!(codes::success::SESSION_STARTED, "Monitor session started",
            "session" => monitor.session_id,
            "states" => monitor.automaton.definition().state_count()
        );
        Ok(monitor)
    }

    pub fn with_preferences(mut self, preferences: MonitorPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    pub fn automaton(&self) -> &RegisterAutomaton {
        &self.automaton
    }

    pub fn is_accepting(&self) -> bool {
        self.automaton.is_accepting()
    }

    /// Adapt one raw event and run it through the automaton
    pub fn process(&mut self, event: &RawEvent) -> Result<MonitorStep, MonitorError> {
        self.stats.processed += 1;

        let mut dataword = self.adapter.handle_event(event).map_err(|e| {
            log_error!(e.error_code(), "Event adaptation failed",
                "session" => self.session_id,
                "event" => &event.name,
                "error" => &e
            );
            e
        })?;

        let outcome = match self.automaton.match_dataword(&mut dataword) {
            Ok(outcome) => outcome,
            Err(e) if self.preferences.skip_on_lookup_error => {
                log_warning!(codes::automaton::EVENT_SKIPPED, "Event skipped",
                    "session" => self.session_id,
                    "code" => e.error_code(),
                    "error" => &e
                );
                self.stats.skipped += 1;
                MatchOutcome::Ignored
            }
            Err(e) => {
                log_error!(e.error_code(), "Matching failed",
                    "session" => self.session_id,
                    "error" => &e
                );
                return Err(e.into());
            }
        };

        match outcome {
            MatchOutcome::Transitioned { from, to } => {
                self.stats.transitions += 1;
                if self.preferences.log_transitions {
                    log_success!(codes::success::TRANSITION_TAKEN, "Transition taken",
                        "session" => self.session_id,
                        "from" => from,
                        "to" => to,
                        "event" => dataword.summary()
                    );
                }
                if self.automaton.is_accepting() {
                    log_success!(codes::success::SESSION_ACCEPTED, "Accepting state reached",
                        "session" => self.session_id,
                        "state" => self.automaton.current_state_name()
                    );
                }
            }
            MatchOutcome::Ignored => {
                self.stats.ignored += 1;
                log_debug!("No transition", "event" => &event.name);
            }
        }

        Ok(MonitorStep {
            dataword,
            outcome,
            accepting: self.automaton.is_accepting(),
        })
    }

    /// Feed a whole trace and render every event as the automaton leaves it
    ///
    /// Events that the monitor does not rewrite render unchanged.
    pub fn rewrite_trace(&mut self, events: &[RawEvent]) -> Result<Vec<String>, MonitorError> {
        let lines = events
            .iter()
            .map(|event| self.process(event).map(|step| step.dataword.render_event()))
            .collect::<Result<Vec<_>, _>>()?;

        log_info!("Trace rewritten",
            "session" => self.session_id,
            "events" => lines.len(),
            "accepting" => self.is_accepting()
        );
        Ok(lines)
    }

    /// Back to the start state with fresh counters, keeping the session id
    pub fn reset(&mut self) {
        self.automaton.reset();
        self.stats = MonitorStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::LookupError;
    use assert_matches::assert_matches;
    use cslang_compiler::automaton::{RegisterOperation, State, Transition};
    use cslang_compiler::{compile_source, ArgumentPosition};

    const FILE_LIFECYCLE: &str = r#"
        # fd flows from open's return value into read and close
        capture open ret as fd;
        capture read 0 as fd;
        capture close 0 as fd;
        open(!fd);
        read(?fd);
        close(?fd);
    "#;

    fn monitor(source: &str, preferences: MonitorPreferences) -> Monitor {
        let specification = compile_source(source).unwrap();
        Monitor::new(&specification).unwrap().with_preferences(preferences)
    }

    fn quiet() -> MonitorPreferences {
        MonitorPreferences {
            skip_on_lookup_error: false,
            log_transitions: false,
        }
    }

    #[test]
    fn test_file_lifecycle_trace() {
        let mut monitor = monitor(FILE_LIFECYCLE, quiet());
        let trace = [
            RawEvent::new("open").with_argument("/etc/hosts").with_return("3"),
            RawEvent::new("fstat").with_argument("3"),
            RawEvent::new("read").with_arguments(["4", "512"]),
            RawEvent::new("read").with_arguments(["3", "512"]),
            RawEvent::new("close").with_argument("3"),
        ];

        let outcomes: Vec<MatchOutcome> = trace
            .iter()
            .map(|event| monitor.process(event).unwrap().outcome)
            .collect();

        assert_eq!(
            outcomes,
            vec![
                MatchOutcome::Transitioned { from: 0, to: 1 },
                MatchOutcome::Ignored,
                MatchOutcome::Ignored,
                MatchOutcome::Transitioned { from: 1, to: 2 },
                MatchOutcome::Transitioned { from: 2, to: 3 },
            ]
        );
        assert!(monitor.is_accepting());
        assert_eq!(
            monitor.stats(),
            MonitorStats {
                processed: 5,
                transitions: 3,
                ignored: 2,
                skipped: 0,
            }
        );
    }

    #[test]
    fn test_adapter_error_fails_the_step() {
        let mut monitor = monitor(FILE_LIFECYCLE, quiet());
        let error = monitor.process(&RawEvent::new("open")).unwrap_err();

        assert_matches!(error, MonitorError::Adapter(AdapterError::MissingReturnValue { .. }));
        assert_eq!(error.error_code(), codes::adapter::MISSING_RETURN_VALUE);
        assert_eq!(monitor.automaton().current_state(), 0);
    }

    fn reads_unwritten_register() -> Monitor {
        monitor("capture close 0 as fd; close(?fd);", quiet())
    }

    #[test]
    fn test_match_error_fails_the_step() {
        let mut monitor = reads_unwritten_register();
        let error = monitor
            .process(&RawEvent::new("close").with_argument("3"))
            .unwrap_err();
        assert_matches!(error, MonitorError::Match(MatchError::UndefinedRegister { .. }));
    }

    #[test]
    fn test_lenient_session_skips_failed_events() {
        let mut monitor = reads_unwritten_register().with_preferences(MonitorPreferences::lenient());
        let step = monitor
            .process(&RawEvent::new("close").with_argument("3"))
            .unwrap();

        assert_eq!(step.outcome, MatchOutcome::Ignored);
        assert!(!step.accepting);
        assert_eq!(monitor.stats().skipped, 1);
        assert_eq!(monitor.stats().ignored, 1);
    }

    #[test]
    fn test_rewrite_trace_substitutes_register_values() {
        let mut definition = AutomatonDefinition::new();
        definition.seed_register("path", "<redacted>");
        let opened = definition.push_state(
            State::new("open").with_write(RegisterOperation::bound(0, "path", "path")),
        );
        definition
            .add_transition(0, Transition::new("open", opened))
            .unwrap();

        let mut preamble = Preamble::new();
        preamble.add_capture("open", "path", ArgumentPosition::Index(0));

        let mut monitor =
            Monitor::from_parts(Arc::new(preamble), Arc::new(definition), quiet()).unwrap();
        let lines = monitor
            .rewrite_trace(&[
                RawEvent::new("open")
                    .with_arguments(["/home/alice/.ssh/id_rsa", "O_RDONLY"])
                    .with_return("3"),
                RawEvent::new("open").with_arguments(["/tmp/x", "O_RDONLY"]),
            ])
            .unwrap();

        assert_eq!(
            lines,
            vec![
                "open(<redacted>, O_RDONLY) = 3".to_string(),
                "open(/tmp/x, O_RDONLY)".to_string(),
            ]
        );
    }

    #[test]
    fn test_rewrite_survives_second_capture_of_same_argument() {
        let mut definition = AutomatonDefinition::new();
        definition.seed_register("path", "<redacted>");
        let opened = definition.push_state(
            State::new("open").with_write(RegisterOperation::bound(0, "path", "path")),
        );
        definition
            .add_transition(0, Transition::new("open", opened))
            .unwrap();

        let mut preamble = Preamble::new();
        preamble.add_capture("open", "path", ArgumentPosition::Index(0));
        preamble.add_capture("open", "raw_path", ArgumentPosition::Index(0));

        let mut monitor =
            Monitor::from_parts(Arc::new(preamble), Arc::new(definition), quiet()).unwrap();
        let step = monitor
            .process(&RawEvent::new("open").with_arguments(["/secret", "O_RDONLY"]))
            .unwrap();

        assert_eq!(step.dataword.captured_arguments[1].value, "/secret");
        assert_eq!(step.dataword.render_event(), "open(<redacted>, O_RDONLY)");
    }

    #[test]
    fn test_ambiguous_capture_surfaces_lookup_error() {
        let mut monitor = monitor(
            "capture dup2 0 as fd; capture dup2 1 as fd; dup2(!fd);",
            quiet(),
        );
        let error = monitor
            .process(&RawEvent::new("dup2").with_arguments(["3", "4"]))
            .unwrap_err();

        assert_matches!(
            error,
            MonitorError::Match(MatchError::LookupFailed {
                source: LookupError::Ambiguous { count: 2, .. },
                ..
            })
        );
    }

    #[test]
    fn test_sessions_are_independent() {
        let specification = compile_source(FILE_LIFECYCLE).unwrap();
        let mut first = Monitor::new(&specification).unwrap().with_preferences(quiet());
        let second = Monitor::new(&specification).unwrap().with_preferences(quiet());

        first
            .process(&RawEvent::new("open").with_argument("/a").with_return("3"))
            .unwrap();

        assert_ne!(first.session_id(), second.session_id());
        assert_eq!(first.automaton().current_state(), 1);
        assert_eq!(second.automaton().current_state(), 0);
        assert!(second.automaton().registers().is_empty());
    }

    #[test]
    fn test_reset_clears_counters() {
        let mut monitor = monitor(FILE_LIFECYCLE, quiet());
        monitor
            .process(&RawEvent::new("open").with_argument("/a").with_return("3"))
            .unwrap();
        let id = monitor.session_id();

        monitor.reset();
        assert_eq!(monitor.stats(), MonitorStats::default());
        assert_eq!(monitor.automaton().current_state(), 0);
        assert_eq!(monitor.session_id(), id);
    }
}
