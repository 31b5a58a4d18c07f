//! Request options: the query/payload descriptor handed to the transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A query parameter key-value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// The parameter key
    pub key: String,
    /// The parameter value, already coerced to a string
    pub value: String,
}

impl QueryParam {
    /// Creates a new query parameter.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Query parameters and optional JSON payload of a request.
///
/// Built by folding parameters in one at a time; setting a key that is
/// already present overwrites its value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    query: Vec<QueryParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl RequestOptions {
    /// Creates empty options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            query: Vec::new(),
            data: None,
        }
    }

    /// Sets a query parameter, replacing any previous value for the key.
    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.query.iter_mut().find(|p| p.key == key) {
            Some(existing) => existing.value = value,
            None => self.query.push(QueryParam { key, value }),
        }
        self
    }

    /// Attaches a JSON payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Returns the query parameters in insertion order.
    #[must_use]
    pub fn query(&self) -> &[QueryParam] {
        &self.query
    }

    /// Returns the query parameters as borrowed pairs.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        self.query
            .iter()
            .map(|p| (p.key.as_str(), p.value.as_str()))
            .collect()
    }

    /// Returns the JSON payload, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_query_params_keep_insertion_order() {
        let options = RequestOptions::new()
            .with_query_param("page", "1")
            .with_query_param("limit", "10");

        assert_eq!(options.query_pairs(), vec![("page", "1"), ("limit", "10")]);
    }

    #[test]
    fn test_query_param_overwrites_same_key() {
        let options = RequestOptions::new()
            .with_query_param("page", "1")
            .with_query_param("page", "2");

        assert_eq!(options.query(), &[QueryParam::new("page", "2")]);
    }

    #[test]
    fn test_data_is_optional() {
        let options = RequestOptions::new();
        assert!(options.data().is_none());

        let options = options.with_data(json!({"name": "Ana"}));
        assert_eq!(options.data(), Some(&json!({"name": "Ana"})));
    }
}
