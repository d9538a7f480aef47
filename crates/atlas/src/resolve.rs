//! Real-path resolution and existence checks.
//!
//! Every other component goes through [`resolve`] so they all agree on what
//! counts as an existing target and what counts as a dead one.

use std::io;
use std::path::{Path, PathBuf};

/// Outcome of resolving a path to its real location.
#[derive(Debug)]
pub enum Resolution {
    /// The path exists; holds the absolute path with every symlink resolved.
    Existing(PathBuf),
    /// The path, or whatever it eventually points at, does not exist.
    Missing,
    /// Resolution was refused by the filesystem.
    Unreadable(io::Error),
}

impl Resolution {
    /// The resolved path, if it exists.
    #[must_use]
    pub fn existing(self) -> Option<PathBuf> {
        match self {
            Self::Existing(path) => Some(path),
            Self::Missing | Self::Unreadable(_) => None,
        }
    }
}

/// Resolves `path` to its canonical absolute form.
///
/// Not-found, not-a-directory and symlink loop errors all mean there is no
/// real target, so they map to [`Resolution::Missing`]. Only permission
/// errors are kept apart, because the target may well exist.
pub fn resolve(path: &Path) -> Resolution {
    match std::fs::canonicalize(path) {
        Ok(real) => Resolution::Existing(real),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Resolution::Unreadable(e),
        Err(_) => Resolution::Missing,
    }
}

/// Makes `path` absolute against the current directory without following
/// any symlink in it.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    std::path::absolute(path)
}
