//! Manifest store
//!
//! The manifest is the JSON document naming the files that should exist
//! in a destination folder. Two wire shapes coexist in the field:
//!
//! - `{"files": [{"filename": ..., "description": ..., "tags": [...]}]}`
//! - `{"description": ..., "file_list": ["a.txt", ...]}`
//!
//! Both are normalized into [`Manifest`] at load time; the shape is
//! detected by key presence, never by a caller-supplied mode. Writing
//! always emits the `files` shape with stable field order, so rewriting
//! unchanged data is byte-identical.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use filelist_fs::{io, validate_file_name};

use crate::{Error, Result};

/// A single declared file with optional metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub filename: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ManifestEntry {
    /// Create an entry with empty description and tags
    pub fn bare(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            description: String::new(),
            tags: Vec::new(),
        }
    }
}

/// A named list of files that should exist in the destination
///
/// Loaded fresh per operation and never cached across operations, so the
/// document on disk is always authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub description: String,
    pub entries: Vec<ManifestEntry>,
}

/// Raw wire form accepting both manifest shapes
#[derive(Debug, Deserialize)]
struct WireManifest {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    files: Option<Vec<WireEntry>>,
    #[serde(default)]
    file_list: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct WireEntry {
    filename: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<String>,
}

/// Serialized form: always the `files` shape, fields in declaration order
#[derive(Debug, Serialize)]
struct WireManifestOut<'a> {
    description: &'a str,
    files: Vec<&'a ManifestEntry>,
}

impl Manifest {
    /// Load a manifest from a JSON file.
    ///
    /// Fails with [`Error::NotFound`] if the file does not exist and
    /// [`Error::Schema`] if it cannot be parsed into the expected shape.
    /// A document with neither `files` nor `file_list` is an empty
    /// manifest, not an error; an entry without a `filename` is rejected.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::not_found(path));
        }
        let content = io::read_text(path)?;
        let wire: WireManifest = serde_json::from_str(&content)
            .map_err(|e| Error::schema(path, e.to_string()))?;

        let description = wire.description.unwrap_or_default();
        let entries = if let Some(files) = wire.files {
            files
                .into_iter()
                .map(|entry| {
                    let filename = entry
                        .filename
                        .ok_or_else(|| Error::schema(path, "entry is missing \"filename\""))?;
                    Ok(ManifestEntry {
                        filename,
                        description: entry.description,
                        tags: entry.tags,
                    })
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            // Bare string lists degenerate into entries without metadata
            wire.file_list
                .unwrap_or_default()
                .into_iter()
                .map(ManifestEntry::bare)
                .collect()
        };

        for entry in &entries {
            validate_file_name(&entry.filename)
                .map_err(|e| Error::schema(path, e.to_string()))?;
        }

        tracing::debug!(path = %path.display(), entries = entries.len(), "loaded manifest");
        Ok(Self {
            description,
            entries,
        })
    }

    /// Write the manifest to a JSON file.
    ///
    /// Parent directories are created as needed. Duplicate filenames are
    /// deduplicated last-write-wins: the value of the last occurrence at
    /// the position of the first. Output is deterministic pretty JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut order: Vec<&str> = Vec::new();
        let mut latest: HashMap<&str, &ManifestEntry> = HashMap::new();
        for entry in &self.entries {
            if !latest.contains_key(entry.filename.as_str()) {
                order.push(&entry.filename);
            }
            latest.insert(&entry.filename, entry);
        }
        let files: Vec<&ManifestEntry> = order.iter().map(|name| latest[name]).collect();

        let wire = WireManifestOut {
            description: &self.description,
            files,
        };
        let mut content = serde_json::to_string_pretty(&wire)
            .map_err(|e| Error::schema(path, e.to_string()))?;
        content.push('\n');
        io::write_text(path, &content)?;

        tracing::debug!(path = %path.display(), "wrote manifest");
        Ok(())
    }

    /// Build a manifest from the immediate regular files of a folder.
    ///
    /// Fails with [`Error::NotFound`] if the folder does not exist. Files
    /// are listed non-recursively, sorted by name, with empty
    /// description and tags.
    pub fn generate_from_folder(folder: &Path) -> Result<Self> {
        if !folder.is_dir() {
            return Err(Error::not_found(folder));
        }
        let entries = io::list_file_names(folder)?
            .into_iter()
            .map(ManifestEntry::bare)
            .collect();
        Ok(Self {
            description: "File list".to_string(),
            entries,
        })
    }

    /// Filenames in manifest order
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.filename.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
