//! History store
//!
//! Recently-used paths for the three input fields, persisted to a JSON
//! side file. Each field is a most-recent-first list capped at
//! [`HISTORY_CAP`] entries: new unique values are prepended and the cap
//! evicts from the tail; recording an existing value changes nothing,
//! not even its position.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use filelist_fs::JsonStore;

use crate::Result;

/// Maximum entries retained per history field
pub const HISTORY_CAP: usize = 10;

/// The three history fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryField {
    FileList,
    SourceFolder,
    DestinationFolder,
}

/// Recently-used paths, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub file_list: Vec<String>,
    #[serde(default)]
    pub source_folder: Vec<String>,
    #[serde(default)]
    pub destination_folder: Vec<String>,
}

impl History {
    fn field_mut(&mut self, field: HistoryField) -> &mut Vec<String> {
        match field {
            HistoryField::FileList => &mut self.file_list,
            HistoryField::SourceFolder => &mut self.source_folder,
            HistoryField::DestinationFolder => &mut self.destination_folder,
        }
    }

    pub fn field(&self, field: HistoryField) -> &[String] {
        match field {
            HistoryField::FileList => &self.file_list,
            HistoryField::SourceFolder => &self.source_folder,
            HistoryField::DestinationFolder => &self.destination_folder,
        }
    }

    /// Record a value in one field.
    ///
    /// Returns `true` if the history changed. Empty values and values
    /// already present are ignored.
    pub fn record(&mut self, field: HistoryField, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        let list = self.field_mut(field);
        if list.iter().any(|existing| existing == value) {
            return false;
        }
        list.insert(0, value.to_string());
        list.truncate(HISTORY_CAP);
        true
    }

    /// Drop duplicates (keeping the first occurrence) and enforce the
    /// cap. Applied after load to tolerate hand-edited files.
    fn normalize(&mut self) {
        for field in [
            HistoryField::FileList,
            HistoryField::SourceFolder,
            HistoryField::DestinationFolder,
        ] {
            let list = self.field_mut(field);
            let mut seen = Vec::new();
            list.retain(|value| {
                if seen.contains(value) {
                    false
                } else {
                    seen.push(value.clone());
                    true
                }
            });
            list.truncate(HISTORY_CAP);
        }
    }
}

/// Persistent store for [`History`]
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    store: JsonStore,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            store: JsonStore::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load history, returning defaults when the file does not exist.
    pub fn load(&self) -> Result<History> {
        if !self.path.exists() {
            return Ok(History::default());
        }
        let mut history: History = self.store.load(&self.path)?;
        history.normalize();
        Ok(history)
    }

    pub fn save(&self, history: &History) -> Result<()> {
        self.store.save(&self.path, history)?;
        tracing::debug!(path = %self.path.display(), "saved history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    #[case(HistoryField::FileList)]
    #[case(HistoryField::SourceFolder)]
    #[case(HistoryField::DestinationFolder)]
    fn record_prepends_new_values(#[case] field: HistoryField) {
        let mut history = History::default();

        assert!(history.record(field, "/first"));
        assert!(history.record(field, "/second"));

        assert_eq!(history.field(field), ["/second", "/first"]);
    }

    #[test]
    fn record_duplicate_is_a_no_op() {
        let mut history = History::default();
        history.record(HistoryField::FileList, "/a");
        history.record(HistoryField::FileList, "/b");

        assert!(!history.record(HistoryField::FileList, "/a"));

        // No reordering either
        assert_eq!(history.file_list, ["/b", "/a"]);
    }

    #[test]
    fn record_never_grows_past_cap() {
        let mut history = History::default();
        for i in 0..25 {
            history.record(HistoryField::SourceFolder, &format!("/src/{i}"));
        }

        assert_eq!(history.source_folder.len(), HISTORY_CAP);
        // Newest kept, oldest evicted from the tail
        assert_eq!(history.source_folder[0], "/src/24");
        assert_eq!(history.source_folder[HISTORY_CAP - 1], "/src/15");
    }

    #[test]
    fn record_ignores_empty_values() {
        let mut history = History::default();
        assert!(!history.record(HistoryField::FileList, ""));
        assert!(history.file_list.is_empty());
    }

    #[test]
    fn load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));

        assert_eq!(store.load().unwrap(), History::default());
    }

    #[test]
    fn load_drops_duplicates_from_hand_edited_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(
            &path,
            r#"{"file_list": ["/a", "/b", "/a"], "source_folder": [], "destination_folder": []}"#,
        )
        .unwrap();

        let history = HistoryStore::new(&path).load().unwrap();

        assert_eq!(history.file_list, ["/a", "/b"]);
    }

    #[test]
    fn round_trips_through_store() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"));
        let mut history = History::default();
        history.record(HistoryField::DestinationFolder, "/dst");
        history.record(HistoryField::FileList, "/lists/weekly.json");

        store.save(&history).unwrap();

        assert_eq!(store.load().unwrap(), history);
    }
}
