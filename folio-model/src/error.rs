//! Error types for the content model.

use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContentError>;

#[derive(Debug, Error)]
pub enum ContentError {
    /// The named property does not exist in the backing data.
    #[error("missing property: {name}")]
    MissingProperty { name: String },

    /// The named property exists but holds the wrong kind of value.
    #[error("property '{name}' is {found}, expected {expected}")]
    ShapeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("index {index} out of bounds for '{name}' (length {len})")]
    IndexOutOfBounds {
        name: String,
        index: usize,
        len: usize,
    },

    /// The element's path no longer resolves to a mapping in its root document.
    #[error("element at '{path}' is detached from its document")]
    Detached { path: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ContentError {
    /// True for [`ContentError::MissingProperty`]; callers treating a property
    /// as optional branch on this.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::MissingProperty { .. })
    }

    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }

    pub(crate) fn missing(name: impl Into<String>) -> Self {
        Self::MissingProperty { name: name.into() }
    }

    pub(crate) fn not_an_object(name: impl Into<String>, found: &Value) -> Self {
        Self::ShapeMismatch {
            name: name.into(),
            expected: "object",
            found: kind_of(found),
        }
    }
}

/// Human-readable kind of a JSON value, used in shape diagnostics.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
