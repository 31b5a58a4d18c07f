//! Path-parameter substitution for endpoint templates.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{DomainError, DomainResult, json_kind};

/// A `{name}` placeholder located in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placeholder<'a> {
    start: usize,
    end: usize,
    name: &'a str,
}

/// Finds the next placeholder at or after `from`.
///
/// A `{` followed by another `{` before the closing brace is skipped, so
/// `{{id}}` yields the inner `{id}`.
fn next_placeholder(template: &str, mut from: usize) -> Option<Placeholder<'_>> {
    loop {
        let open = from + template[from..].find('{')?;
        let close = open + 1 + template[open + 1..].find('}')?;
        let name = &template[open + 1..close];
        if name.contains('{') {
            from = open + 1;
            continue;
        }
        return Some(Placeholder {
            start: open,
            end: close + 1,
            name,
        });
    }
}

/// Replaces every `{name}` in `template` with the matching path param.
///
/// The template is scanned once from left to right, so substituted values
/// are never scanned again. Placeholders with no matching param are kept
/// literally.
///
/// # Errors
///
/// Returns [`DomainError::NonStringPathParam`] if any param value is not a
/// JSON string.
pub fn substitute(template: &str, params: &BTreeMap<String, Value>) -> DomainResult<String> {
    let mut values = BTreeMap::new();
    for (name, value) in params {
        let Value::String(text) = value else {
            return Err(DomainError::NonStringPathParam {
                name: name.clone(),
                found: json_kind(value),
            });
        };
        values.insert(name.as_str(), text.as_str());
    }

    let mut output = String::with_capacity(template.len());
    let mut cursor = 0;
    while let Some(placeholder) = next_placeholder(template, cursor) {
        output.push_str(&template[cursor..placeholder.start]);
        match values.get(placeholder.name) {
            Some(value) => output.push_str(value),
            None => output.push_str(&template[placeholder.start..placeholder.end]),
        }
        cursor = placeholder.end;
    }
    output.push_str(&template[cursor..]);

    Ok(output)
}

/// Lists the placeholder names still present in an endpoint.
#[must_use]
pub fn unresolved_placeholders(endpoint: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut cursor = 0;
    while let Some(placeholder) = next_placeholder(endpoint, cursor) {
        names.push(placeholder.name);
        cursor = placeholder.end;
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn params(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_substitutes_every_param() {
        let params = params(&[("id", json!("7")), ("orderId", json!("99"))]);
        let result = substitute("/users/{id}/orders/{orderId}", &params);
        assert_eq!(result, Ok("/users/7/orders/99".to_string()));
    }

    #[test]
    fn test_repeated_placeholder() {
        let params = params(&[("id", json!("3"))]);
        let result = substitute("/a/{id}/b/{id}", &params);
        assert_eq!(result, Ok("/a/3/b/3".to_string()));
    }

    #[test]
    fn test_missing_param_is_left_in_place() {
        let params = params(&[("id", json!("7"))]);
        let result = substitute("/users/{id}/orders/{orderId}", &params);
        assert_eq!(result, Ok("/users/7/orders/{orderId}".to_string()));
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let params = params(&[("a", json!("{b}")), ("b", json!("x"))]);
        let result = substitute("/{a}/{b}", &params);
        assert_eq!(result, Ok("/{b}/x".to_string()));
    }

    #[test]
    fn test_nested_braces() {
        let params = params(&[("id", json!("5"))]);
        assert_eq!(substitute("/{{id}}", &params), Ok("/{5}".to_string()));
        assert_eq!(substitute("/{unclosed", &params), Ok("/{unclosed".to_string()));
    }

    #[test]
    fn test_non_string_value_is_rejected() {
        let params = params(&[("id", json!(42))]);
        assert_eq!(
            substitute("/resource/{id}", &params),
            Err(DomainError::NonStringPathParam {
                name: "id".to_string(),
                found: "number",
            })
        );
    }

    #[test]
    fn test_unresolved_placeholders() {
        assert_eq!(
            unresolved_placeholders("/users/{id}/orders/{orderId}"),
            vec!["id", "orderId"]
        );
        assert!(unresolved_placeholders("/users/7").is_empty());
    }
}
