//! Type errors.

use std::fmt;

use dark_ir::{DType, UserTypeName};
use thiserror::Error;

/// What went wrong.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeErrorKind {
    #[error("Could not find type {}_v{}", .0.name, .0.version)]
    TypeLookupFailure(UserTypeName),

    #[error("Expected to see a value of type {} but found a {}", .expected.type_name(), .actual.type_name())]
    TypeUnificationFailure { expected: DType, actual: DType },

    #[error("{}", mismatched_fields_message(.missing, .extra))]
    MismatchedRecordFields {
        missing: Vec<String>,
        extra: Vec<String>,
    },
}

fn mismatched_fields_message(missing: &[String], extra: &[String]) -> String {
    let missing = (!missing.is_empty())
        .then(|| format!("Expected but did not find: [{}]", missing.join(", ")));
    let extra =
        (!extra.is_empty()).then(|| format!("Found but did not expect: [{}]", extra.join(", ")));
    match (missing, extra) {
        (Some(m), Some(e)) => format!("{m} & {e}"),
        (Some(msg), None) | (None, Some(msg)) => msg,
        (None, None) => "Record fields do not match".to_string(),
    }
}

/// A type error and where it was found.
///
/// `path` names the parameter, column or field, outermost first. It is empty
/// for a mismatch at the root of the checked value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeError {
    pub path: Vec<String>,
    pub kind: TypeErrorKind,
}

impl TypeError {
    pub fn new(kind: TypeErrorKind) -> Self {
        TypeError {
            path: Vec::new(),
            kind,
        }
    }

    /// Prefix the path with an enclosing name.
    #[must_use]
    pub fn within(mut self, name: &str) -> Self {
        self.path.insert(0, name.to_string());
        self
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.kind)
        }
    }
}

impl std::error::Error for TypeError {}

/// Render a list of errors for an `Error` dval.
pub fn errors_to_string(errors: &[TypeError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
