//! Grammar definitions for the specification language

pub mod ast;
pub mod keywords;

pub use ast::{
    CaptureDeclaration, EventPattern, Identifier, Parameter, ParameterKind,
    PredicateDeclaration, RegisterAssignment, Statement,
};
pub use keywords::Keyword;
