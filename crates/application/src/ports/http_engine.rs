//! HTTP engine port

use std::collections::BTreeMap;

use apicheck_domain::{HttpMethod, RequestOptions, ResponseSpec};
use thiserror::Error;

/// Errors surfaced by the HTTP transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The endpoint could not be joined onto the base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The transport gave up waiting.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The engine or context was already disposed.
    #[error("request context already disposed")]
    Disposed,

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Configuration of one request context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextOptions {
    /// URL every endpoint is resolved against.
    pub base_url: String,
    /// Headers sent with every request of the context.
    pub headers: BTreeMap<String, String>,
}

/// A worker-owned HTTP engine that hands out request contexts.
///
/// One engine belongs to one worker; it is never shared between scenarios
/// running concurrently.
pub trait HttpEngine {
    /// The context type this engine creates.
    type Context: RequestContext;

    /// Creates a request context bound to a base URL and header set.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is closed or the options are invalid.
    fn new_context(&self, options: ContextOptions) -> Result<Self::Context, TransportError>;

    /// Releases the engine. Called once, after its contexts are disposed.
    fn close(&mut self) {}
}

/// A request context: base URL and headers plus verb-specific dispatch.
pub trait RequestContext {
    /// Identifier used to correlate log lines.
    fn id(&self) -> &str;

    /// Sends a request and blocks until the response is available.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or read.
    fn fetch(
        &self,
        method: HttpMethod,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<ResponseSpec, TransportError>;

    /// Sends a GET request.
    fn get(&self, endpoint: &str, options: &RequestOptions) -> Result<ResponseSpec, TransportError> {
        self.fetch(HttpMethod::Get, endpoint, options)
    }

    /// Sends a POST request.
    fn post(&self, endpoint: &str, options: &RequestOptions) -> Result<ResponseSpec, TransportError> {
        self.fetch(HttpMethod::Post, endpoint, options)
    }

    /// Sends a PUT request.
    fn put(&self, endpoint: &str, options: &RequestOptions) -> Result<ResponseSpec, TransportError> {
        self.fetch(HttpMethod::Put, endpoint, options)
    }

    /// Sends a PATCH request.
    fn patch(&self, endpoint: &str, options: &RequestOptions) -> Result<ResponseSpec, TransportError> {
        self.fetch(HttpMethod::Patch, endpoint, options)
    }

    /// Sends a DELETE request.
    fn delete(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<ResponseSpec, TransportError> {
        self.fetch(HttpMethod::Delete, endpoint, options)
    }

    /// Cookies the context would send, for request attachments.
    fn cookies(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Releases the context. Called exactly once by the owning session.
    fn dispose(&mut self);
}
