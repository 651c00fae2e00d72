//! Manifest file name validation

use crate::{Error, Result};

/// Validate that a manifest file name is a single safe path segment.
///
/// Manifest entries are joined onto caller-supplied folders, so anything
/// that could escape the folder is rejected: absolute paths, path
/// separators, and the `.`/`..` segments.
pub fn validate_file_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name == "." || name == ".." {
        Some("must not be a dot segment")
    } else if name.contains('/') || name.contains('\\') {
        Some("must not contain path separators")
    } else if name.contains('\0') {
        Some("must not contain NUL")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidFileName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
