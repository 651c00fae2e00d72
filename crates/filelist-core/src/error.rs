//! Error types for filelist-core

use std::path::PathBuf;

/// Result type for filelist-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in filelist-core operations
///
/// Only setup failures surface here: a manifest or folder that is absent
/// when required, a manifest that does not parse, or a settings mutation
/// on an unrecognized key. Per-file copy failures are aggregated into the
/// [`ReconciliationResult`](crate::ReconciliationResult) sets instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required manifest or folder does not exist
    #[error("Not found: {path}")]
    NotFound { path: PathBuf },

    /// The manifest is present but does not match the expected shape
    #[error("Invalid manifest at {path}: {message}")]
    Schema { path: PathBuf, message: String },

    /// Settings mutation on a key that is not a recognized setting
    #[error("Unknown setting: {name}")]
    UnknownField { name: String },

    /// Filesystem error from filelist-fs
    #[error(transparent)]
    Fs(#[from] filelist_fs::Error),
}

impl Error {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn schema(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: message.into(),
        }
    }
}
