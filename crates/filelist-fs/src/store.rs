//! Typed JSON document store
//!
//! Load/save helpers for the JSON side files (manifest, settings,
//! history). Serialization goes through `to_string_pretty`, which keeps
//! struct field order, so rewriting unchanged data is byte-identical.

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result, io};

/// Format-fixed JSON store.
///
/// Reads and writes typed documents as pretty-printed JSON with atomic
/// writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStore;

impl JsonStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a document from a file.
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = io::read_text(path)?;
        serde_json::from_str(&content).map_err(|e| Error::JsonParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save a document to a file.
    ///
    /// Uses atomic write to prevent corruption; a trailing newline is
    /// appended so the file round-trips cleanly through editors.
    pub fn save<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let mut content =
            serde_json::to_string_pretty(value).map_err(|e| Error::JsonSerialize {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        content.push('\n');
        io::write_atomic(path, content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[test]
    fn round_trips_a_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let store = JsonStore::new();

        let doc = Doc {
            name: "a".into(),
            count: 3,
        };
        store.save(&path, &doc).unwrap();
        let loaded: Doc = store.load(&path).unwrap();

        assert_eq!(loaded, doc);
    }

    #[test]
    fn repeated_saves_are_byte_identical() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let store = JsonStore::new();
        let doc = Doc {
            name: "a".into(),
            count: 3,
        };

        store.save(&path, &doc).unwrap();
        let first = std::fs::read(&path).unwrap();
        store.save(&path, &doc).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn load_reports_parse_failures_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonStore::new().load::<Doc>(&path).unwrap_err();
        assert!(matches!(err, Error::JsonParse { .. }));
    }
}
