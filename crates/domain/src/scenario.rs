//! Per-scenario request state.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::request::{Request, RequestOptions};
use crate::response::ResponseSpec;

/// Folder prepended to bare schema file names.
pub const DEFAULT_SCHEMA_FOLDER: &str = "schemas/";

/// Mutable request state accumulated by the steps of one scenario.
///
/// Steps add params, headers and body fields incrementally;
/// [`assemble`](Self::assemble) snapshots the current state into a
/// [`Request`] without clearing it, so later steps can extend the state
/// and build further requests (for example chaining a path param taken
/// from the previous response). Call [`reset`](Self::reset) between
/// scenarios.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRequestState {
    schema_folder: String,
    query_params: BTreeMap<String, String>,
    path_params: BTreeMap<String, Value>,
    headers: BTreeMap<String, String>,
    body: Map<String, Value>,
    json_schema_file: String,
    response: Option<ResponseSpec>,
}

impl Default for ScenarioRequestState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioRequestState {
    /// Creates empty state using [`DEFAULT_SCHEMA_FOLDER`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_schema_folder(DEFAULT_SCHEMA_FOLDER)
    }

    /// Creates empty state resolving schema names under `folder`.
    #[must_use]
    pub fn with_schema_folder(folder: impl Into<String>) -> Self {
        Self {
            schema_folder: folder.into(),
            query_params: BTreeMap::new(),
            path_params: BTreeMap::new(),
            headers: BTreeMap::new(),
            body: Map::new(),
            json_schema_file: String::new(),
            response: None,
        }
    }

    /// Snapshots the current state into an immutable [`Request`].
    #[must_use]
    pub fn assemble(&self) -> Request {
        let mut options = self
            .query_params
            .iter()
            .fold(RequestOptions::new(), |options, (key, value)| {
                options.with_query_param(key.as_str(), value.as_str())
            });

        if !self.body.is_empty() {
            options = options.with_data(Value::Object(self.body.clone()));
        }

        let request = Request::new(options)
            .with_body(self.body.clone())
            .with_path_params(self.path_params.clone())
            .with_headers(self.headers.clone());

        if self.json_schema_file.is_empty() {
            request
        } else {
            request.with_schema_path(self.json_schema_file.clone())
        }
    }

    /// Clears everything except the schema folder.
    pub fn reset(&mut self) {
        *self = Self::with_schema_folder(std::mem::take(&mut self.schema_folder));
    }

    /// Replaces all query params.
    pub fn set_query_params(&mut self, params: BTreeMap<String, String>) {
        self.query_params = params;
    }

    /// Adds or overwrites a query param.
    pub fn add_query_param(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.query_params.insert(field.into(), value.into());
    }

    /// Current query params.
    #[must_use]
    pub const fn query_params(&self) -> &BTreeMap<String, String> {
        &self.query_params
    }

    /// Adds or overwrites a path param.
    pub fn add_path_param(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.path_params.insert(field.into(), value.into());
    }

    /// Current path params.
    #[must_use]
    pub const fn path_params(&self) -> &BTreeMap<String, Value> {
        &self.path_params
    }

    /// Replaces all headers.
    pub fn set_headers(&mut self, headers: BTreeMap<String, String>) {
        self.headers = headers;
    }

    /// Adds or overwrites a header.
    pub fn add_header(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(field.into(), value.into());
    }

    /// Current headers.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Replaces the body.
    pub fn set_body(&mut self, body: Map<String, Value>) {
        self.body = body;
    }

    /// Adds or overwrites a body field.
    pub fn add_body_param(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.body.insert(field.into(), value.into());
    }

    /// Current body.
    #[must_use]
    pub const fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Sets the schema file, prefixed with the schema folder.
    pub fn set_json_schema_file(&mut self, schema: &str) {
        self.json_schema_file = format!("{}{schema}", self.schema_folder);
    }

    /// Folder-prefixed schema path, empty until one is set.
    #[must_use]
    pub fn json_schema_file(&self) -> &str {
        &self.json_schema_file
    }

    /// Stores the most recent response.
    pub fn set_response(&mut self, response: ResponseSpec) {
        self.response = Some(response);
    }

    /// The most recent response, if a request has been sent.
    #[must_use]
    pub const fn response(&self) -> Option<&ResponseSpec> {
        self.response.as_ref()
    }
}
