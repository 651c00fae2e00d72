//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// File List Manager - Reconcile manifest-declared files between folders
#[derive(Parser, Debug)]
#[command(name = "filelist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file location
    #[arg(long, global = true, default_value = "settings.json")]
    pub settings_file: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Copy manifest-declared files from source to destination
    ///
    /// List names are resolved against the configured lists folder;
    /// source and destination come from settings unless overridden.
    Copy {
        /// Manifest list names or paths
        #[arg(required = true)]
        lists: Vec<String>,

        /// Validate the source against each list after copying
        #[arg(long)]
        validate: bool,

        /// Source folder (defaults to the configured one)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Destination folder (defaults to the configured one)
        #[arg(short, long)]
        destination: Option<PathBuf>,
    },

    /// Mirror every regular file from source to destination (no manifest)
    CopyAll {
        /// Source folder (defaults to the configured one)
        source: Option<PathBuf>,

        /// Destination folder (defaults to the configured one)
        destination: Option<PathBuf>,
    },

    /// Generate a manifest from a folder's files
    List {
        /// Folder to list (defaults to the configured source)
        source: Option<PathBuf>,

        /// Folder receiving the manifest when no lists folder is set
        destination: Option<PathBuf>,

        /// Manifest file name
        #[arg(default_value = "file_list.json")]
        name: String,
    },

    /// Validate that every file a list declares exists in the source
    Validate {
        /// Manifest list name or path
        list: String,
    },

    /// Validate that every source file exists in the destination
    ValidateAll {
        /// Source folder (defaults to the configured one)
        source: Option<PathBuf>,

        /// Destination folder (defaults to the configured one)
        destination: Option<PathBuf>,
    },

    /// Report destination files a list does not account for
    Extra {
        /// Manifest list name or path
        list: String,

        /// Destination folder (defaults to the configured one)
        destination: Option<PathBuf>,
    },

    /// Set a configured folder (source_folder, destination_folder, lists_folder)
    Set {
        /// Field name
        field: String,

        /// Folder path
        path: String,
    },

    /// Print the current settings
    Settings,

    /// Start the interactive command loop
    Repl,
}
