//! Register automaton runtime

mod engine;
mod error;
mod lookup;
mod registers;

pub use engine::{MatchOutcome, RegisterAutomaton};
pub use error::MatchError;
pub use lookup::{find_captured_argument, find_captured_index, LookupError};
pub use registers::RegisterBank;
