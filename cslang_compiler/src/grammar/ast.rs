//! Statement nodes produced by the parser
//!
//! One node per grammar production. Every node keeps the span of its source
//! text so compiler errors and warnings can point back at the statement.
//! Nodes render back to specification syntax through `Display`.

use crate::preamble::ArgumentPosition;
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event, register and binding names: `[A-Za-z_][A-Za-z0-9_]*`
pub type Identifier = String;

/// `capture <event> <position|ret> as <binding>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureDeclaration {
    pub event: Identifier,
    pub position: ArgumentPosition,
    pub binding: Identifier,
    pub span: Option<Span>,
}

/// `predicate <event> <binding> == "<literal>"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateDeclaration {
    pub event: Identifier,
    pub binding: Identifier,
    pub expected: String,
    pub span: Option<Span>,
}

/// `<register> <- "<literal>"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterAssignment {
    pub register: Identifier,
    pub value: String,
    pub span: Option<Span>,
}

/// How an event pattern parameter uses its register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    /// `?reg`: guard the transition on the register's value
    Read,
    /// `!reg`: store the argument into the register on entry
    Write,
    /// Bare name, no register effect
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub kind: ParameterKind,
    pub name: Identifier,
    pub span: Option<Span>,
}

impl Parameter {
    pub fn new(kind: ParameterKind, name: impl Into<Identifier>) -> Self {
        Self {
            kind,
            name: name.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

/// `<event>(<parameter>, ...)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPattern {
    pub event: Identifier,
    pub parameters: Vec<Parameter>,
    pub span: Option<Span>,
}

impl EventPattern {
    /// Parameters of one kind with their list index
    pub fn parameters_of(&self, kind: ParameterKind) -> impl Iterator<Item = (usize, &Parameter)> {
        self.parameters
            .iter()
            .enumerate()
            .filter(move |(_, parameter)| parameter.kind == kind)
    }
}

/// Any statement of a specification program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    Capture(CaptureDeclaration),
    Predicate(PredicateDeclaration),
    Assignment(RegisterAssignment),
    Pattern(EventPattern),
}

impl Statement {
    pub fn span(&self) -> Option<Span> {
        match self {
            Statement::Capture(node) => node.span,
            Statement::Predicate(node) => node.span,
            Statement::Assignment(node) => node.span,
            Statement::Pattern(node) => node.span,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Capture(_) => "capture declaration",
            Statement::Predicate(_) => "predicate declaration",
            Statement::Assignment(_) => "register assignment",
            Statement::Pattern(_) => "event pattern",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKind::Read => write!(f, "?"),
            ParameterKind::Write => write!(f, "!"),
            ParameterKind::Plain => Ok(()),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.name)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Capture(c) => {
                write!(f, "capture {} {} as {};", c.event, c.position, c.binding)
            }
            Statement::Predicate(p) => {
                write!(f, "predicate {} {} == \"{}\";", p.event, p.binding, p.expected)
            }
            Statement::Assignment(a) => write!(f, "{} <- \"{}\";", a.register, a.value),
            Statement::Pattern(p) => {
                let parameters: Vec<String> =
                    p.parameters.iter().map(|param| param.to_string()).collect();
                write!(f, "{}({});", p.event, parameters.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_display_round_trips_syntax() {
        let capture = Statement::Capture(CaptureDeclaration {
            event: "open".into(),
            position: ArgumentPosition::Return,
            binding: "fd".into(),
            span: None,
        });
        assert_eq!(capture.to_string(), "capture open ret as fd;");

        let pattern = Statement::Pattern(EventPattern {
            event: "read".into(),
            parameters: vec![
                Parameter::new(ParameterKind::Read, "fd"),
                Parameter::new(ParameterKind::Write, "buf"),
                Parameter::new(ParameterKind::Plain, "count"),
            ],
            span: None,
        });
        assert_eq!(pattern.to_string(), "read(?fd, !buf, count);");
    }

    #[test]
    fn test_parameters_of_kind_keep_list_index() {
        let pattern = EventPattern {
            event: "read".into(),
            parameters: vec![
                Parameter::new(ParameterKind::Plain, "x"),
                Parameter::new(ParameterKind::Read, "fd"),
                Parameter::new(ParameterKind::Write, "buf"),
                Parameter::new(ParameterKind::Read, "len"),
            ],
            span: None,
        };

        let reads: Vec<(usize, &str)> = pattern
            .parameters_of(ParameterKind::Read)
            .map(|(i, p)| (i, p.name.as_str()))
            .collect();
        assert_eq!(reads, vec![(1, "fd"), (3, "len")]);
    }
}
