//! Shared command context
//!
//! Settings are loaded once when the context is created and mutated only
//! through the store, which persists after every change.

use std::path::{Path, PathBuf};

use filelist_core::{Settings, SettingsStore};

use crate::error::{CliError, Result};

/// Settings plus their backing store, shared by all commands
pub struct Context {
    pub store: SettingsStore,
    pub settings: Settings,
}

impl Context {
    /// Load settings from the given file, defaulting on first run.
    pub fn load(settings_file: &Path) -> Result<Self> {
        let store = SettingsStore::new(settings_file);
        let settings = store.load()?;
        Ok(Self { store, settings })
    }

    /// Resolve the source folder from an explicit argument or settings.
    pub fn source(&self, arg: Option<PathBuf>) -> Result<PathBuf> {
        resolve(arg, self.settings.source_folder.clone(), "Source")
    }

    /// Resolve the destination folder from an explicit argument or settings.
    pub fn destination(&self, arg: Option<PathBuf>) -> Result<PathBuf> {
        resolve(arg, self.settings.destination_folder.clone(), "Destination")
    }
}

fn resolve(arg: Option<PathBuf>, configured: Option<PathBuf>, what: &str) -> Result<PathBuf> {
    arg.or(configured).ok_or_else(|| {
        CliError::user(format!(
            "{what} folder must be set or provided. Use 'set {}_folder <path>'.",
            what.to_lowercase()
        ))
    })
}
