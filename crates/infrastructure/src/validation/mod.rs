//! JSON Schema contract validation.

mod json_schema;
mod schema_source;

pub use json_schema::JsonSchemaValidator;
pub use schema_source::{DirectorySchemaSource, EmbeddedSchemaSource};
