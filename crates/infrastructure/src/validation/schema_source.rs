//! Schema resource adapters.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use apicheck_application::ports::SchemaSource;

/// Reads schema resources from a directory on disk.
///
/// A schema path such as `schemas/user.json` resolves to
/// `<root>/schemas/user.json`.
#[derive(Debug, Clone)]
pub struct DirectorySchemaSource {
    root: PathBuf,
}

impl DirectorySchemaSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The resource root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SchemaSource for DirectorySchemaSource {
    fn load(&self, path: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.root.join(path)) {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Schema resources bundled in memory, e.g. with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedSchemaSource {
    documents: HashMap<String, String>,
}

impl EmbeddedSchemaSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document under `path`.
    #[must_use]
    pub fn with_schema(mut self, path: impl Into<String>, document: impl Into<String>) -> Self {
        self.documents.insert(path.into(), document.into());
        self
    }
}

impl SchemaSource for EmbeddedSchemaSource {
    fn load(&self, path: &str) -> io::Result<Option<String>> {
        Ok(self.documents.get(path).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_directory_source_reads_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("schemas")).unwrap();
        std::fs::write(dir.path().join("schemas/user.json"), r#"{"type":"object"}"#).unwrap();

        let source = DirectorySchemaSource::new(dir.path());

        assert_eq!(
            source.load("schemas/user.json").unwrap(),
            Some(r#"{"type":"object"}"#.to_string())
        );
        assert_eq!(source.load("schemas/missing.json").unwrap(), None);
    }

    #[test]
    fn test_embedded_source() {
        let source = EmbeddedSchemaSource::new().with_schema("schemas/a.json", "{}");
        assert_eq!(source.load("schemas/a.json").unwrap(), Some("{}".to_string()));
        assert_eq!(source.load("schemas/b.json").unwrap(), None);
    }
}
