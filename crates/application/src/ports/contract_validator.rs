//! Contract validation port

use apicheck_domain::ResponseSpec;

use crate::contract::SchemaValidationError;

/// Checks a response body against a JSON Schema resource.
pub trait ContractValidator {
    /// Validates `response` against the schema at `schema_path`.
    ///
    /// Both inputs are required; passing `None` is a configuration error,
    /// not a validation failure.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::Mismatch`] listing every violation
    /// when the body does not conform, or another variant when the check
    /// itself could not run.
    fn validate(
        &self,
        response: Option<&ResponseSpec>,
        schema_path: Option<&str>,
    ) -> Result<(), SchemaValidationError>;
}
