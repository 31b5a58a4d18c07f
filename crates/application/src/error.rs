//! Application error types

use apicheck_domain::DomainError;
use thiserror::Error;

use crate::contract::SchemaValidationError;
use crate::execute_request::ExecuteRequestError;

/// Application-level errors raised by scenario steps.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Sending the request failed.
    #[error(transparent)]
    Execute(#[from] ExecuteRequestError),

    /// The response did not satisfy its contract, or the contract could
    /// not be checked.
    #[error(transparent)]
    Contract(#[from] SchemaValidationError),

    /// A step needed the previous response but none was recorded.
    #[error("no response recorded; send a request first")]
    NoResponse,

    /// The previous response body is not JSON.
    #[error("response body is not valid JSON: {0}")]
    InvalidResponseBody(#[source] serde_json::Error),

    /// The previous response has no such top-level field.
    #[error("field '{0}' not found in the previous response")]
    FieldNotFound(String),

    /// The response status differs from the expected one.
    #[error("expected status code {expected}, got {actual}")]
    StatusMismatch {
        /// Status the step expected.
        expected: u16,
        /// Status the response carried.
        actual: u16,
    },
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
