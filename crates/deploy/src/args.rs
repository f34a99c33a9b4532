//! Constructor argument coercion.

use serde::Serialize;
use std::fmt;

/// A constructor argument as typed into the deploy form.
///
/// Only the exact literals `true` and `false` become booleans. Everything else, numbers and
/// addresses included, is kept as text and parsed against the constructor parameter type at
/// encoding time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConstructorArg {
    Bool(bool),
    String(String),
}

impl ConstructorArg {
    /// Coerces a single raw argument.
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            other => Self::String(other.to_string()),
        }
    }
}

impl fmt::Display for ConstructorArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => value.fmt(f),
            Self::String(value) => f.write_str(value),
        }
    }
}

/// Coerces every raw argument, preserving order and length.
pub fn coerce_args(args: &[String]) -> Vec<ConstructorArg> {
    args.iter().map(|arg| ConstructorArg::coerce(arg)).collect()
}
