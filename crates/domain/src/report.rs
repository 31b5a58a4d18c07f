//! Diagnostic attachment records handed to the reporting collaborator.
//!
//! Only the data lives here; rendering belongs to the reporter.

use std::collections::BTreeMap;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::HttpMethod;
use crate::response::ResponseSpec;

/// What was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestAttachment {
    /// Final URL reported by the transport.
    pub url: String,
    /// Verb used.
    pub method: HttpMethod,
    /// Headers configured on the request context.
    pub headers: BTreeMap<String, String>,
    /// Cookies sent with the request.
    pub cookies: BTreeMap<String, String>,
    /// Body as JSON text, if one was sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// When the attachment was produced.
    pub recorded_at: DateTime<Utc>,
}

/// What came back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseAttachment {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Pretty-printed body when it is a JSON document, empty otherwise.
    pub body: String,
    /// When the attachment was produced.
    pub recorded_at: DateTime<Utc>,
}

impl ResponseAttachment {
    /// Builds the attachment from a response.
    #[must_use]
    pub fn from_response(response: &ResponseSpec) -> Self {
        Self {
            status: response.status,
            headers: response.headers.clone(),
            body: pretty_body(&response.body),
            recorded_at: Utc::now(),
        }
    }
}

/// Pretty-prints a body that looks like a JSON document.
///
/// Bodies without a `{`, or that fail to parse, render as an empty string.
#[must_use]
pub fn pretty_body(body: &str) -> String {
    if !body.contains('{') {
        return String::new();
    }
    serde_json::from_str::<serde_json::Value>(body)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_default()
}
