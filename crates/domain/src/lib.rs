//! apicheck Domain - Core harness types
//!
//! This crate defines the request/response model of the apicheck API
//! test harness together with the pure algorithms that shape a request:
//! value transformation, path-parameter substitution and scenario state
//! assembly. All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod id;
pub mod path;
pub mod report;
pub mod request;
pub mod response;
pub mod scenario;
pub mod timing;
pub mod transform;

pub use error::{DomainError, DomainResult};
pub use id::generate_id_v7;
pub use path::{substitute, unresolved_placeholders};
pub use report::{RequestAttachment, ResponseAttachment};
pub use request::{HttpMethod, QueryParam, Request, RequestOptions};
pub use response::ResponseSpec;
pub use scenario::{DEFAULT_SCHEMA_FOLDER, ScenarioRequestState};
pub use timing::ElapsedTime;
pub use transform::{MAX_TOKEN_LENGTH, Token, TransformRule, transform, transform_with};
