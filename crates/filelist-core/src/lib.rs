//! Core layer for File List Manager
//!
//! This crate owns everything with real semantics:
//!
//! - **Manifest store**: loads and writes the JSON file-list document,
//!   normalizing both wire shapes into one in-memory model
//! - **Settings store**: the three configured folder roles, persisted
//!   after every mutation
//! - **History store**: recently-used paths as bounded,
//!   most-recent-first lists
//! - **Reconciliation engine**: copy planning/execution and the three
//!   discrepancy sets
//!
//! Adapters (CLI, web) collect parameters and render results; they call
//! into this crate and contain no reconciliation logic of their own.

pub mod engine;
pub mod error;
pub mod history;
pub mod manifest;
pub mod settings;

pub use engine::ReconciliationResult;
pub use error::{Error, Result};
pub use history::{HISTORY_CAP, History, HistoryField, HistoryStore};
pub use manifest::{Manifest, ManifestEntry};
pub use settings::{Settings, SettingsStore};
