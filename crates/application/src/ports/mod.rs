//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the harness core and the systems it
//! drives. Each port is a trait implemented by adapters in the
//! infrastructure layer.

mod contract_validator;
mod http_engine;
mod reporter;
mod schema_source;

pub use contract_validator::ContractValidator;
pub use http_engine::{ContextOptions, HttpEngine, RequestContext, TransportError};
pub use reporter::{NoopReporter, Reporter};
pub use schema_source::SchemaSource;
