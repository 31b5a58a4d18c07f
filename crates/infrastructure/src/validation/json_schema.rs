//! Draft-07 contract validation backed by the `jsonschema` crate.

use apicheck_application::ports::{ContractValidator, SchemaSource};
use apicheck_application::{SchemaValidationError, SchemaViolations, Violation};
use apicheck_domain::ResponseSpec;
use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use tracing::{debug, warn};

/// Validates response bodies against schema resources under Draft-07.
#[derive(Debug, Clone)]
pub struct JsonSchemaValidator<S> {
    source: S,
}

impl<S: SchemaSource> JsonSchemaValidator<S> {
    /// Creates a validator loading schemas from `source`.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// The schema source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    fn load_schema(&self, schema_path: &str) -> Result<Value, SchemaValidationError> {
        let document = self
            .source
            .load(schema_path)
            .map_err(|source| SchemaValidationError::Io {
                path: schema_path.to_string(),
                source,
            })?
            .ok_or_else(|| SchemaValidationError::SchemaNotFound(schema_path.to_string()))?;

        serde_json::from_str(&document).map_err(|source| SchemaValidationError::Parse {
            target: format!("schema {schema_path}"),
            source,
        })
    }
}

impl<S: SchemaSource> ContractValidator for JsonSchemaValidator<S> {
    fn validate(
        &self,
        response: Option<&ResponseSpec>,
        schema_path: Option<&str>,
    ) -> Result<(), SchemaValidationError> {
        let response = response.ok_or(SchemaValidationError::MissingArgument("response"))?;
        let schema_path = schema_path
            .filter(|path| !path.trim().is_empty())
            .ok_or(SchemaValidationError::MissingArgument("schema path"))?;

        let instance: Value =
            serde_json::from_str(&response.body).map_err(|source| SchemaValidationError::Parse {
                target: "response body".to_string(),
                source,
            })?;
        let schema = self.load_schema(schema_path)?;

        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| SchemaValidationError::InvalidSchema {
                path: schema_path.to_string(),
                message: e.to_string(),
            })?;

        let violations: Vec<Violation> = match compiled.validate(&instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|error| Violation::new(error.instance_path.to_string(), error.to_string()))
                .collect(),
        };

        if violations.is_empty() {
            debug!(schema = schema_path, "response matches contract");
            return Ok(());
        }

        warn!(
            schema = schema_path,
            count = violations.len(),
            "response does not match contract"
        );
        Err(SchemaValidationError::Mismatch(SchemaViolations::new(
            schema_path,
            violations,
        )))
    }
}
