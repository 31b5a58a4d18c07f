//! Contract validation outcomes.

use std::fmt;

use thiserror::Error;

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer to the offending value (`/age`), empty for the root.
    pub instance_path: String,
    /// Human-readable description from the schema engine.
    pub message: String,
}

impl Violation {
    /// Creates a violation.
    #[must_use]
    pub fn new(instance_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            instance_path: instance_path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Every violation found for one document, reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolations {
    schema_path: String,
    violations: Vec<Violation>,
}

impl SchemaViolations {
    /// Groups the violations found against `schema_path`.
    #[must_use]
    pub fn new(schema_path: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            schema_path: schema_path.into(),
            violations,
        }
    }

    /// Schema the document was checked against.
    #[must_use]
    pub fn schema_path(&self) -> &str {
        &self.schema_path
    }

    /// The individual violations.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns true when nothing was violated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for SchemaViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "JSON is invalid according to the JSON Schema: {}",
            self.schema_path
        )?;
        for violation in &self.violations {
            writeln!(f, "{violation}")?;
        }
        Ok(())
    }
}

/// Errors raised while checking a response against its contract.
#[derive(Debug, Error)]
pub enum SchemaValidationError {
    /// A required input was absent.
    #[error("{0} must be present for schema validation")]
    MissingArgument(&'static str),

    /// No schema resource exists at the given path.
    #[error("JSON schema file not found: {0}")]
    SchemaNotFound(String),

    /// The schema document is JSON but not a usable schema.
    #[error("invalid JSON schema {path}: {message}")]
    InvalidSchema {
        /// Schema resource path.
        path: String,
        /// Compilation error reported by the schema engine.
        message: String,
    },

    /// The response body or the schema document is not valid JSON.
    #[error("error validating JSON against JSON Schema: {target} is not valid JSON")]
    Parse {
        /// Which document failed to parse.
        target: String,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The schema resource exists but could not be read.
    #[error("error reading JSON schema {path}")]
    Io {
        /// Schema resource path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document does not conform to the schema.
    #[error("{0}")]
    Mismatch(SchemaViolations),
}

impl SchemaValidationError {
    /// Returns true for configuration errors that should abort the
    /// scenario rather than be reported as a failed check.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument(_) | Self::SchemaNotFound(_) | Self::InvalidSchema { .. }
        )
    }

    /// Returns the violations when this is a schema mismatch.
    #[must_use]
    pub const fn violations(&self) -> Option<&SchemaViolations> {
        match self {
            Self::Mismatch(violations) => Some(violations),
            _ => None,
        }
    }
}

/// Turns a validation result into a test-assertion failure.
///
/// A mismatch panics with the full itemized report so the test runner
/// marks the scenario failed with every violation visible.
///
/// # Panics
///
/// Panics when `result` is an error.
#[allow(clippy::panic)]
pub fn assert_contract(result: Result<(), SchemaValidationError>) {
    if let Err(error) = result {
        panic!("{error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn age_mismatch() -> SchemaValidationError {
        SchemaValidationError::Mismatch(SchemaViolations::new(
            "schemas/user.json",
            vec![
                Violation::new("/age", r#""seven" is not of type "integer""#),
                Violation::new("", r#""name" is a required property"#),
            ],
        ))
    }

    #[test]
    fn test_mismatch_report_lists_every_violation() {
        assert_eq!(
            age_mismatch().to_string(),
            "JSON is invalid according to the JSON Schema: schemas/user.json\n\
             /age: \"seven\" is not of type \"integer\"\n\
             \"name\" is a required property\n"
        );
    }

    #[test]
    fn test_fatal_kinds() {
        assert!(SchemaValidationError::MissingArgument("response").is_fatal());
        assert!(SchemaValidationError::SchemaNotFound("schemas/x.json".into()).is_fatal());
        assert!(!age_mismatch().is_fatal());
        assert_eq!(
            age_mismatch().violations().map(|v| v.violations().len()),
            Some(2)
        );
    }

    #[test]
    #[should_panic(expected = "/age")]
    fn test_assert_contract_panics_with_report() {
        assert_contract(Err(age_mismatch()));
    }

    #[test]
    fn test_assert_contract_accepts_ok() {
        assert_contract(Ok(()));
    }
}
