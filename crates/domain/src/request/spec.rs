//! The assembled, immutable request snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RequestOptions;

/// A point-in-time request produced by
/// [`ScenarioRequestState::assemble`](crate::ScenarioRequestState::assemble).
///
/// Fields are private and only readable; the `with_*` methods consume the
/// value, so a `Request` cannot change once it has been handed out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    options: RequestOptions,
    #[serde(default)]
    body: Map<String, Value>,
    #[serde(default)]
    path_params: BTreeMap<String, Value>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema_path: Option<String>,
}

impl Request {
    /// Creates a request around the given options.
    #[must_use]
    pub fn new(options: RequestOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Sets the body fields.
    #[must_use]
    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = body;
        self
    }

    /// Sets the unresolved path params.
    #[must_use]
    pub fn with_path_params(mut self, path_params: BTreeMap<String, Value>) -> Self {
        self.path_params = path_params;
        self
    }

    /// Sets the scenario headers.
    #[must_use]
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the schema the response is expected to match.
    #[must_use]
    pub fn with_schema_path(mut self, schema_path: impl Into<String>) -> Self {
        self.schema_path = Some(schema_path.into());
        self
    }

    /// Query/payload descriptor handed to the transport.
    #[must_use]
    pub const fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Body fields as they were when the request was assembled.
    #[must_use]
    pub const fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Path params, not yet substituted into any endpoint.
    #[must_use]
    pub const fn path_params(&self) -> &BTreeMap<String, Value> {
        &self.path_params
    }

    /// Scenario headers sent alongside the fixed content type.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Schema resource path, if the scenario declared one.
    #[must_use]
    pub fn schema_path(&self) -> Option<&str> {
        self.schema_path.as_deref()
    }
}
