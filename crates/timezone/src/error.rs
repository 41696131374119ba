//! Possible error types encountered while decoding a wire value.
use std::fmt;

use serde::de;

/// Error produced when decoding a wire value into a [`Zone`] fails.
///
/// Decoding is strict: a missing required field or a field holding the wrong
/// primitive type fails outright, identified by its path in the wire value
/// (i.e 'n', 'e[3].s'). No partially decoded zone is ever produced.
///
/// [`Zone`]: crate::Zone
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A required field was absent from the wire value.
    #[error("missing required field '{0}'")]
    Missing(String),
    /// A field held a value of the wrong primitive type.
    #[error("invalid type at '{path}': expected {expected}, found {found}")]
    InvalidType {
        /// Path to the offending field.
        path: String,
        /// The primitive type the decoder expected.
        expected: &'static str,
        /// The kind of value actually found.
        found: &'static str,
    },
    /// Custom deserialization errors
    #[error("{0}")]
    Custom(String),
}

impl DecodeError {
    pub(crate) fn missing(path: impl Into<String>) -> Self {
        Self::Missing(path.into())
    }

    pub(crate) fn invalid_type(
        path: impl Into<String>,
        expected: &'static str,
        found: &serde_json::Value,
    ) -> Self {
        Self::InvalidType {
            path: path.into(),
            expected,
            found: json_kind(found),
        }
    }
}

/// Describes the kind of a wire value for [`DecodeError::InvalidType`].
fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "a map",
    }
}

impl de::Error for DecodeError {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self::Custom(msg.to_string())
    }
}
