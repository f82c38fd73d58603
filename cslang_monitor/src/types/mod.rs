//! Event and dataword types shared by the adapter and the automaton

pub mod dataword;
pub mod event;

pub use dataword::{CapturedArgument, Dataword};
pub use event::RawEvent;
