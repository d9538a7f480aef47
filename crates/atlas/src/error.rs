//! Error types for atlas operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for atlas operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Reading or writing a persisted file failed.
    #[error("Storage error: {0}")]
    Flatfile(#[from] atlas_flatfile::Error),

    /// An expected persisted file is missing.
    #[error(
        "Cannot open '{}' for reading. Please specify the path of atlas with --atlas-path, or use --generate to generate one.",
        path.display()
    )]
    NotFound {
        /// The file that was looked for.
        path: PathBuf,
    },

    /// A user-supplied value was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A query was attempted against an index with no entries.
    #[error("Index is empty, unable to check targets. Use --generate to build one first.")]
    EmptyIndex,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The external delete command failed for a link.
    #[error("Failed to remove '{}': {reason}", link.display())]
    Removal {
        /// The symlink that could not be removed.
        link: PathBuf,
        /// What went wrong.
        reason: String,
    },
}

/// A specialized Result type for atlas operations.
pub type Result<T> = std::result::Result<T, Error>;
