//! By-name captured argument lookup
//!
//! Guards, stores and writes all resolve their argument through here. A
//! name must identify exactly one captured argument.

use crate::types::{CapturedArgument, Dataword};
use cslang_compiler::logging::{codes, Code};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("No captured argument named '{name}'")]
    NotFound { name: String },

    #[error("Captured argument name '{name}' is ambiguous ({count} matches)")]
    Ambiguous { name: String, count: usize },
}

impl LookupError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::NotFound { .. } => codes::automaton::CAPTURED_ARGUMENT_NOT_FOUND,
            Self::Ambiguous { .. } => codes::automaton::AMBIGUOUS_CAPTURED_ARGUMENT,
        }
    }
}

/// Index of the single captured argument called `name`
pub fn find_captured_index(dataword: &Dataword, name: &str) -> Result<usize, LookupError> {
    let mut matches = dataword
        .captured_arguments
        .iter()
        .enumerate()
        .filter(|(_, argument)| argument.name == name)
        .map(|(index, _)| index);

    let first = matches.next().ok_or_else(|| LookupError::NotFound {
        name: name.to_string(),
    })?;

    let extra = matches.count();
    if extra > 0 {
        return Err(LookupError::Ambiguous {
            name: name.to_string(),
            count: extra + 1,
        });
    }
    Ok(first)
}

pub fn find_captured_argument<'d>(
    dataword: &'d Dataword,
    name: &str,
) -> Result<&'d CapturedArgument, LookupError> {
    let index = find_captured_index(dataword, name)?;
    Ok(&dataword.captured_arguments[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawEvent;
    use assert_matches::assert_matches;
    use cslang_compiler::ArgumentPosition;

    fn dataword(names: &[&str]) -> Dataword {
        let arguments = names
            .iter()
            .enumerate()
            .map(|(i, name)| CapturedArgument::new(*name, ArgumentPosition::Index(i), i.to_string()))
            .collect();
        Dataword::new(RawEvent::new("read"), arguments, vec![])
    }

    #[test]
    fn test_lookup_is_by_name_not_position() {
        let dataword = dataword(&["count", "fd"]);
        let argument = find_captured_argument(&dataword, "fd").unwrap();

        assert_eq!(argument.value, "1");
        assert_eq!(find_captured_index(&dataword, "count"), Ok(0));
    }

    #[test]
    fn test_missing_and_duplicate_names() {
        assert_matches!(
            find_captured_argument(&dataword(&["fd"]), "buf"),
            Err(LookupError::NotFound { name }) if name == "buf"
        );
        assert_matches!(
            find_captured_argument(&dataword(&["fd", "x", "fd"]), "fd"),
            Err(LookupError::Ambiguous { count: 2, .. })
        );
        assert_matches!(
            find_captured_argument(&dataword(&[]), "fd"),
            Err(LookupError::NotFound { .. })
        );
    }
}
