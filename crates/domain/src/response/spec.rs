//! The response a transport hands back to the harness.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP response as returned by the transport.
///
/// The harness only reads it. `body` is the lossy UTF-8 view of
/// `body_bytes`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase reported by the transport, empty when unknown.
    #[serde(default)]
    pub status_text: String,
    /// Response headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Body as text.
    pub body: String,
    /// Body as received.
    #[serde(skip)]
    pub body_bytes: Vec<u8>,
    /// Time spent by the transport.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    /// Final URL the response was served from.
    #[serde(default)]
    pub url: String,
    /// `Content-Type` header, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl ResponseSpec {
    /// Builds a response from what the transport read off the wire.
    #[must_use]
    pub fn new(
        status: u16,
        headers: HashMap<String, String>,
        body_bytes: Vec<u8>,
        duration: Duration,
    ) -> Self {
        let content_type = find_header(&headers, "content-type").cloned();
        Self {
            status,
            status_text: String::new(),
            body: String::from_utf8_lossy(&body_bytes).into_owned(),
            headers,
            body_bytes,
            duration,
            url: String::new(),
            content_type,
        }
    }

    /// Records the URL the response came from.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Records the reason phrase.
    #[must_use]
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the body is not valid JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Looks a header up by name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name).map(String::as_str)
    }
}

fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a String> {
    headers
        .iter()
        .find_map(|(k, v)| k.eq_ignore_ascii_case(name).then_some(v))
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
