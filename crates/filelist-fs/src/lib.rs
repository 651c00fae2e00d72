//! Filesystem primitives for File List Manager
//!
//! Provides safe manifest filename validation, atomic I/O, and typed JSON
//! store helpers shared by the manifest, settings, and history stores.

pub mod error;
pub mod io;
pub mod path;
pub mod store;

pub use error::{Error, Result};
pub use path::validate_file_name;
pub use store::JsonStore;
