use serde::{Deserialize, Serialize};
use std::fmt;

/// One observed event as delivered by a trace source
///
/// Arguments are kept as the source rendered them; string arguments are
/// expected without surrounding quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub name: String,
    pub arguments: Vec<String>,
    pub return_value: Option<String>,
}

impl RawEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            return_value: None,
        }
    }

    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    pub fn with_return(mut self, value: impl Into<String>) -> Self {
        self.return_value = Some(value.into());
        self
    }
}

/// `name(arg, ...) = ret`
impl fmt::Display for RawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.arguments.join(", "))?;
        if let Some(value) = &self.return_value {
            write!(f, " = {}", value)?;
        }
        Ok(())
    }
}
