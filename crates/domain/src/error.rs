//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while shaping a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A path parameter holds a value that is not a JSON string.
    #[error("path param '{name}' must be a string, got {found}")]
    NonStringPathParam {
        /// Name of the offending parameter.
        name: String,
        /// JSON kind of the value that was found.
        found: &'static str,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Returns the JSON kind name of a value, for error messages.
#[must_use]
pub const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
