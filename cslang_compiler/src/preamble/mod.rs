//! Capture and predicate configuration declared before the first event
//! pattern
//!
//! Both tables are keyed by event name and keep declaration order: the
//! adapter materializes captured arguments in exactly this order, which is
//! what gives event pattern parameters their positional meaning.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Where a captured value comes from in a raw event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentPosition {
    /// Zero-based index into the argument list
    Index(usize),
    /// The event's return value
    Return,
}

impl fmt::Display for ArgumentPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentPosition::Index(index) => write!(f, "{}", index),
            ArgumentPosition::Return => write!(f, "ret"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSpec {
    pub arg_name: String,
    pub position: ArgumentPosition,
}

/// Equality test of one captured argument against a literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateSpec {
    pub arg_name: String,
    pub expected: String,
}

impl PredicateSpec {
    pub fn evaluate(&self, value: &str) -> bool {
        value == self.expected
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preamble {
    pub captures: BTreeMap<String, Vec<CaptureSpec>>,
    pub predicates: BTreeMap<String, Vec<PredicateSpec>>,
}

impl Preamble {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_capture(
        &mut self,
        event: impl Into<String>,
        arg_name: impl Into<String>,
        position: ArgumentPosition,
    ) {
        self.captures
            .entry(event.into())
            .or_default()
            .push(CaptureSpec {
                arg_name: arg_name.into(),
                position,
            });
    }

    pub fn add_predicate(
        &mut self,
        event: impl Into<String>,
        arg_name: impl Into<String>,
        expected: impl Into<String>,
    ) {
        self.predicates
            .entry(event.into())
            .or_default()
            .push(PredicateSpec {
                arg_name: arg_name.into(),
                expected: expected.into(),
            });
    }

    pub fn captures_for(&self, event: &str) -> &[CaptureSpec] {
        self.captures.get(event).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn predicates_for(&self, event: &str) -> &[PredicateSpec] {
        self.predicates.get(event).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_captures(&self, event: &str) -> bool {
        !self.captures_for(event).is_empty()
    }

    /// Name of the argument captured in slot `index` for `event`
    pub fn binding_at(&self, event: &str, index: usize) -> Option<&str> {
        self.captures_for(event)
            .get(index)
            .map(|capture| capture.arg_name.as_str())
    }

    pub fn capture_count(&self) -> usize {
        self.captures.values().map(Vec::len).sum()
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty() && self.predicates.is_empty()
    }
}

impl fmt::Display for Preamble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Preamble:")?;
        for (event, captures) in &self.captures {
            for capture in captures {
                writeln!(
                    f,
                    "  capture {} {} as {}",
                    event, capture.position, capture.arg_name
                )?;
            }
        }
        for (event, predicates) in &self.predicates {
            for predicate in predicates {
                writeln!(
                    f,
                    "  predicate {} {} == \"{}\"",
                    event, predicate.arg_name, predicate.expected
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_keep_declaration_order() {
        let mut preamble = Preamble::new();
        preamble.add_capture("read", "fd", ArgumentPosition::Index(0));
        preamble.add_capture("read", "count", ArgumentPosition::Return);
        preamble.add_capture("open", "path", ArgumentPosition::Index(0));

        assert_eq!(preamble.binding_at("read", 0), Some("fd"));
        assert_eq!(preamble.binding_at("read", 1), Some("count"));
        assert_eq!(preamble.binding_at("read", 2), None);
        assert_eq!(preamble.binding_at("close", 0), None);
        assert_eq!(preamble.capture_count(), 3);
        assert!(preamble.has_captures("open"));
        assert!(!preamble.has_captures("close"));
    }

    #[test]
    fn test_predicate_is_exact_equality() {
        let predicate = PredicateSpec {
            arg_name: "mode".into(),
            expected: "O_RDONLY".into(),
        };
        assert!(predicate.evaluate("O_RDONLY"));
        assert!(!predicate.evaluate("o_rdonly"));
        assert!(!predicate.evaluate("O_RDONLY|O_CLOEXEC"));
    }

    #[test]
    fn test_position_serialization() {
        let json = serde_json::to_string(&ArgumentPosition::Index(2)).unwrap();
        assert_eq!(json, r#"{"index":2}"#);
        let json = serde_json::to_string(&ArgumentPosition::Return).unwrap();
        assert_eq!(json, r#""return""#);
    }

    #[test]
    fn test_display_lists_declarations() {
        let mut preamble = Preamble::new();
        preamble.add_capture("open", "fd", ArgumentPosition::Return);
        preamble.add_predicate("open", "fd", "3");

        let listing = preamble.to_string();
        assert!(listing.contains("capture open ret as fd"));
        assert!(listing.contains("predicate open fd == \"3\""));
    }
}
