//! Compiled register automaton model
//!
//! Plain data produced by the compiler and consumed by the runtime. Nothing
//! here executes transitions; see the monitor crate for that.

pub mod definition;
pub mod operation;
pub mod state;
pub mod transition;

pub use definition::{AutomatonDefinition, DefinitionError, START_STATE_NAME};
pub use operation::RegisterOperation;
pub use state::State;
pub use transition::Transition;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn open_close() -> AutomatonDefinition {
        let mut definition = AutomatonDefinition::new();
        let open = definition.push_state(
            State::new("open").with_store(RegisterOperation::bound(0, "fd", "fd")),
        );
        definition
            .add_transition(0, Transition::new("open", open))
            .unwrap();
        let close = definition.push_state(State::new("close").accepting(true));
        definition
            .add_transition(
                open,
                Transition::new("close", close).with_match(RegisterOperation::bound(0, "fd", "fd")),
            )
            .unwrap();
        definition.seed_register("a", "5");
        definition
    }

    #[test]
    fn test_new_definition_has_start_state() {
        let definition = AutomatonDefinition::new();

        assert_eq!(definition.state_count(), 1);
        assert_eq!(definition.states[0].name, START_STATE_NAME);
        assert!(!definition.states[0].accepting);
        assert_eq!(definition.last_index(), 0);
        assert!(definition.validate().is_ok());
    }

    #[test]
    fn test_chain_construction() {
        let definition = open_close();

        assert_eq!(definition.state_count(), 3);
        assert_eq!(definition.transition_count(), 2);
        assert_eq!(definition.accepting_states().collect::<Vec<_>>(), vec![2]);
        assert_eq!(definition.register_names(), vec!["a", "fd"]);
        assert!(definition.validate().is_ok());
    }

    #[test]
    fn test_dangling_transition_is_rejected() {
        let mut definition = AutomatonDefinition::new();
        assert_matches!(
            definition.add_transition(0, Transition::new("open", 1)),
            Err(DefinitionError::DanglingTransition { target: 1, .. })
        );
        assert_matches!(
            definition.add_transition(4, Transition::new("open", 0)),
            Err(DefinitionError::UnknownState { index: 4 })
        );

        definition.states[0].add_transition(Transition::new("open", 9));
        assert_matches!(
            definition.validate(),
            Err(DefinitionError::DanglingTransition { from: 0, target: 9, .. })
        );
    }

    #[test]
    fn test_multiple_transitions_keep_order() {
        let mut definition = AutomatonDefinition::new();
        let a = definition.push_state(State::new("a"));
        let b = definition.push_state(State::new("b"));
        definition.add_transition(0, Transition::new("x", a)).unwrap();
        definition.add_transition(0, Transition::new("x", b)).unwrap();

        let targets: Vec<usize> = definition.states[0]
            .transitions
            .iter()
            .map(|t| t.target)
            .collect();
        assert_eq!(targets, vec![a, b]);
    }

    #[test]
    fn test_display_listing() {
        let listing = open_close().to_string();

        assert!(listing.starts_with("Automaton: 3 states, 2 transitions"));
        assert!(listing.contains("a <- \"5\""));
        assert!(listing.contains("[0] start"));
        assert!(listing.contains("on open -> 1"));
        assert!(listing.contains("store fd#0 ~ fd"));
        assert!(listing.contains("on close [fd#0 ~ fd] -> 2"));
        assert!(listing.contains("[2] close (accepting)"));
    }

    #[test]
    fn test_json_structure_round_trip() {
        let definition = open_close();
        let json = serde_json::to_string(&definition).unwrap();
        let restored: AutomatonDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, definition);
    }
}
