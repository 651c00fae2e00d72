//! Settings store
//!
//! The three configured folder roles, persisted to a JSON side file.
//! Loaded once at startup; every mutation is followed by a synchronous
//! save so the on-disk state never lags the in-memory state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use filelist_fs::JsonStore;

use crate::{Error, Result};

/// Recognized settings field names, in display order
pub const SETTING_FIELDS: [&str; 3] = ["source_folder", "destination_folder", "lists_folder"];

/// Configured folder roles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub source_folder: Option<PathBuf>,
    pub destination_folder: Option<PathBuf>,
    pub lists_folder: Option<PathBuf>,
}

impl Settings {
    /// Look up a field by its wire name
    pub fn get(&self, name: &str) -> Result<Option<&Path>> {
        match name {
            "source_folder" => Ok(self.source_folder.as_deref()),
            "destination_folder" => Ok(self.destination_folder.as_deref()),
            "lists_folder" => Ok(self.lists_folder.as_deref()),
            _ => Err(Error::UnknownField {
                name: name.to_string(),
            }),
        }
    }

    fn set_value(&mut self, name: &str, value: PathBuf) -> Result<()> {
        match name {
            "source_folder" => self.source_folder = Some(value),
            "destination_folder" => self.destination_folder = Some(value),
            "lists_folder" => self.lists_folder = Some(value),
            _ => {
                return Err(Error::UnknownField {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Resolve a list name against the configured lists folder.
    ///
    /// Bare names are searched in `lists_folder` when one is configured;
    /// anything containing a path separator, and everything when no
    /// lists folder is set, is used as given.
    pub fn resolve_list_path(&self, name: &str) -> PathBuf {
        match &self.lists_folder {
            Some(folder) if !name.contains('/') && !name.contains('\\') => folder.join(name),
            _ => PathBuf::from(name),
        }
    }
}

/// Persistent store for [`Settings`]
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    store: JsonStore,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            store: JsonStore::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, returning defaults when the file does not exist.
    ///
    /// A missing settings file is the normal first-run state, not an
    /// error.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        Ok(self.store.load(&self.path)?)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        self.store.save(&self.path, settings)?;
        tracing::debug!(path = %self.path.display(), "saved settings");
        Ok(())
    }

    /// Update one field and persist immediately.
    ///
    /// Fails with [`Error::UnknownField`] if `name` is not a recognized
    /// setting; the settings and the file are left unchanged in that
    /// case.
    pub fn set(&self, settings: &mut Settings, name: &str, value: &str) -> Result<()> {
        settings.set_value(name, PathBuf::from(value))?;
        self.save(settings)
    }
}
