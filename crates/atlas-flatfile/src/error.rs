//! Error types for atlas-flatfile operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for atlas-flatfile operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A path cannot be written because it is not valid UTF-8.
    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    /// A field would produce a line the reader cannot parse back.
    #[error("Invalid flat file format: {0}")]
    InvalidFormat(String),
}

/// A specialized Result type for atlas-flatfile operations.
pub type Result<T> = std::result::Result<T, Error>;
