//! HTTP verbs a scenario step can name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// HTTP verb of a step.
///
/// Only GET, POST, PUT, PATCH and DELETE can be dispatched. HEAD and OPTIONS
/// parse so that a step naming them fails at dispatch time with a clear
/// message instead of at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

const NAMES: [(HttpMethod, &str); 7] = [
    (HttpMethod::Get, "GET"),
    (HttpMethod::Post, "POST"),
    (HttpMethod::Put, "PUT"),
    (HttpMethod::Patch, "PATCH"),
    (HttpMethod::Delete, "DELETE"),
    (HttpMethod::Head, "HEAD"),
    (HttpMethod::Options, "OPTIONS"),
];

impl HttpMethod {
    /// Whether the endpoint template is resolved against the request's
    /// path params before dispatch.
    ///
    /// PATCH and DELETE target an identifier captured earlier in the
    /// scenario; the other verbs send the endpoint verbatim.
    #[must_use]
    pub const fn substitutes_path_params(self) -> bool {
        matches!(self, Self::Patch | Self::Delete)
    }

    /// Upper-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        NAMES[self as usize].1
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        NAMES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
            .map(|(method, _)| *method)
            .ok_or_else(|| DomainError::UnsupportedMethod(s.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert_eq!("OPTIONS".parse::<HttpMethod>().unwrap(), HttpMethod::Options);
    }

    #[test]
    fn test_unknown_verb_is_rejected() {
        assert_eq!(
            "trace".parse::<HttpMethod>(),
            Err(DomainError::UnsupportedMethod("trace".to_string()))
        );
    }

    #[test]
    fn test_names_round_trip() {
        for (method, name) in NAMES {
            assert_eq!(method.to_string(), name);
            assert_eq!(name.parse::<HttpMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_only_patch_and_delete_substitute() {
        let substituting: Vec<_> = NAMES
            .iter()
            .map(|(method, _)| *method)
            .filter(|m| m.substitutes_path_params())
            .collect();
        assert_eq!(substituting, vec![HttpMethod::Patch, HttpMethod::Delete]);
    }
}
