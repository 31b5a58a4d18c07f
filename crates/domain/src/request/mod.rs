//! HTTP request domain types

mod method;
mod options;
mod spec;

pub use method::HttpMethod;
pub use options::{QueryParam, RequestOptions};
pub use spec::Request;
