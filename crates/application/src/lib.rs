//! apicheck Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits for the HTTP engine, schema resources, reporting and
//!   contract validation
//! - The request execution use case and the worker-scoped session
//! - The scenario step facade used by step definitions
//! - Application-level error handling

pub mod contract;
pub mod error;
pub mod execute_request;
pub mod ports;
pub mod session;
pub mod steps;

pub use contract::{SchemaValidationError, SchemaViolations, Violation, assert_contract};
pub use error::{ApplicationError, ApplicationResult};
pub use execute_request::{ExecuteRequestError, ExecutedRequest, RequestExecutor};
pub use ports::{
    ContextOptions, ContractValidator, HttpEngine, NoopReporter, Reporter, RequestContext,
    SchemaSource, TransportError,
};
pub use session::ApiSession;
pub use steps::ScenarioSteps;
