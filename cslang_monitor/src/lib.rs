//! # CSLang Monitor
//!
//! Runs compiled CSLang specifications over event traces: raw events are
//! adapted into datawords by the preamble, then matched by a register
//! automaton that may store argument values into registers or write
//! register values back into the event.

pub mod adapter;
pub mod automaton;
pub mod config;
pub mod monitor;
pub mod types;

pub use adapter::{AdapterError, EventAdapter};
pub use automaton::{MatchError, MatchOutcome, RegisterAutomaton};
pub use monitor::{Monitor, MonitorError, MonitorStats, MonitorStep};
pub use types::{CapturedArgument, Dataword, RawEvent};

pub mod prelude {
    pub use crate::adapter::{AdapterError, EventAdapter};
    pub use crate::automaton::{
        find_captured_argument, LookupError, MatchError, MatchOutcome, RegisterAutomaton,
        RegisterBank,
    };
    pub use crate::config::MonitorPreferences;
    pub use crate::monitor::{Monitor, MonitorError, MonitorStats, MonitorStep};
    pub use crate::types::{CapturedArgument, Dataword, RawEvent};

    pub use cslang_compiler::{
        compile_source, AutomatonDefinition, CompileError, CompiledSpecification, Preamble,
    };
}
