//! Reconciliation engine
//!
//! Compares a manifest against source and destination folders, copies
//! what is missing or changed, and reports the three discrepancy sets.
//!
//! Failure semantics: only setup problems (a folder that is entirely
//! absent) abort an operation. Per-file failures — a source file that
//! vanished, a permission error mid-copy — are logged and end up in the
//! result sets; one bad file never aborts the batch.
//!
//! Caller contract: operations do not serialize access internally. Two
//! concurrent reconciliations against the same destination folder can
//! observe each other's partial copies, so callers must treat each
//! destination folder as requiring exclusive access for the duration of
//! one operation.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use filetime::FileTime;

use crate::{Error, Manifest, Result};

/// Outcome of one reconciliation pass, immutable after creation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// Files copied during this invocation
    pub copied: usize,
    /// Manifest entries absent from the destination after the copy pass
    pub missing_in_destination: BTreeSet<String>,
    /// Manifest entries absent from the source
    pub missing_in_source: BTreeSet<String>,
    /// Destination files the manifest does not account for (drift)
    pub extra_in_destination: BTreeSet<String>,
}

impl ReconciliationResult {
    /// True when destination exactly satisfies the manifest
    pub fn is_clean(&self) -> bool {
        self.missing_in_destination.is_empty() && self.extra_in_destination.is_empty()
    }
}

/// Copy every manifest entry from `source` to `destination`.
///
/// Fails with [`Error::NotFound`] if `source` does not exist; the
/// destination folder is not created in that case. Otherwise the
/// destination is created as needed and each entry present in the source
/// is copied over it (overwrite semantics), preserving the source
/// modification time. Entries absent from the source are recorded and
/// processing continues.
///
/// `missing_in_destination` is recomputed from the filesystem after the
/// copy pass rather than derived from copy bookkeeping, so the reported
/// state is authoritative even when files were removed concurrently.
pub fn copy(manifest: &Manifest, source: &Path, destination: &Path) -> Result<ReconciliationResult> {
    if !source.is_dir() {
        return Err(Error::not_found(source));
    }
    fs::create_dir_all(destination)
        .map_err(|e| filelist_fs::Error::io(destination, e))?;

    tracing::info!(
        source = %source.display(),
        destination = %destination.display(),
        entries = manifest.len(),
        "starting manifest copy"
    );

    let mut result = ReconciliationResult::default();
    for entry in &manifest.entries {
        let from = source.join(&entry.filename);
        if !from.is_file() {
            tracing::debug!(file = %entry.filename, "not present in source");
            result.missing_in_source.insert(entry.filename.clone());
            continue;
        }
        let to = destination.join(&entry.filename);
        match copy_preserving_mtime(&from, &to) {
            Ok(()) => result.copied += 1,
            Err(e) => {
                tracing::warn!(file = %entry.filename, error = %e, "copy failed");
            }
        }
    }

    result.missing_in_destination = validate_destination(manifest, destination)?;
    result.extra_in_destination = extra_in_destination(manifest, destination)?;

    tracing::info!(
        copied = result.copied,
        missing = result.missing_in_destination.len(),
        "manifest copy finished"
    );
    Ok(result)
}

/// Report manifest entries absent from the destination folder.
///
/// Read-only; fails with [`Error::NotFound`] if the destination folder
/// does not exist. Purely a function of current filesystem state, so
/// calling it twice without intervening mutation yields identical
/// results.
pub fn validate_destination(manifest: &Manifest, destination: &Path) -> Result<BTreeSet<String>> {
    if !destination.is_dir() {
        return Err(Error::not_found(destination));
    }
    Ok(manifest
        .filenames()
        .filter(|name| !destination.join(name).exists())
        .map(str::to_string)
        .collect())
}

/// Report manifest entries not present as regular files in the source.
pub fn validate_source(manifest: &Manifest, source: &Path) -> Result<BTreeSet<String>> {
    if !source.is_dir() {
        return Err(Error::not_found(source));
    }
    Ok(manifest
        .filenames()
        .filter(|name| !source.join(name).is_file())
        .map(str::to_string)
        .collect())
}

/// Report destination files the manifest does not account for.
///
/// The destination's immediate regular files minus the manifest's
/// filenames. Read-only; used for drift detection.
pub fn extra_in_destination(manifest: &Manifest, destination: &Path) -> Result<BTreeSet<String>> {
    if !destination.is_dir() {
        return Err(Error::not_found(destination));
    }
    let declared: BTreeSet<&str> = manifest.filenames().collect();
    Ok(filelist_fs::io::list_file_names(destination)?
        .into_iter()
        .filter(|name| !declared.contains(name.as_str()))
        .collect())
}

/// Mirror every immediate regular file of `source` into `destination`.
///
/// The manifest-less "copy everything" mode. Fails fast with
/// [`Error::NotFound`] if `source` is absent, before anything is
/// copied; per-file failures afterwards are logged and skipped. Returns
/// the number of files copied.
pub fn copy_all_from_folder(source: &Path, destination: &Path) -> Result<usize> {
    if !source.is_dir() {
        return Err(Error::not_found(source));
    }
    fs::create_dir_all(destination)
        .map_err(|e| filelist_fs::Error::io(destination, e))?;

    let mut copied = 0;
    for name in filelist_fs::io::list_file_names(source)? {
        match copy_preserving_mtime(&source.join(&name), &destination.join(&name)) {
            Ok(()) => copied += 1,
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "copy failed");
            }
        }
    }

    tracing::info!(
        source = %source.display(),
        destination = %destination.display(),
        copied,
        "folder mirror finished"
    );
    Ok(copied)
}

/// Copy one file, carrying the source modification time to the copy.
fn copy_preserving_mtime(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::copy(from, to)?;
    let metadata = fs::metadata(from)?;
    filetime::set_file_mtime(to, FileTime::from_last_modification_time(&metadata))?;
    Ok(())
}
