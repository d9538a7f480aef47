//! The operating mode selected on the command line.

use std::fmt;

/// What a single invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report the symlinks affected by changing the targets
    Check,
    /// Scan the targets and write a new atlas
    Generate,
    /// Scan the targets and merge into the existing atlas
    Update,
    /// Remove the affected symlinks in version control
    Delete,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Check => write!(f, "check"),
            Self::Generate => write!(f, "generate"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}
