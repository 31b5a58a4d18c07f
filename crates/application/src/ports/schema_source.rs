//! Schema resource port

use std::io;

/// Resolves a schema path (for example `schemas/user.json`) to the text of
/// a bundled JSON Schema document.
pub trait SchemaSource: Send + Sync {
    /// Loads the document, or `None` if no resource exists at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource exists but cannot be read.
    fn load(&self, path: &str) -> io::Result<Option<String>>;
}
