//! Warning types for non-fatal problems found while reading flat files.
//!
//! A hand-edited or truncated index should not make the whole file
//! unreadable. Lines that cannot be parsed are skipped and reported as a
//! [`Warning`] so callers can surface them.
//!
//! # Examples
//!
//! ```
//! use atlas_flatfile::{RecordError, Warning};
//!
//! let warning = Warning::MalformedRecord {
//!     line_number: 5,
//!     error: RecordError::MissingSeparator,
//! };
//! assert_eq!(warning.line_number(), 5);
//! assert_eq!(warning.to_string(), "line 5: skipped: missing separator");
//! ```

use crate::record::RecordError;
use std::fmt;

/// A non-fatal warning that occurred while reading a flat file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A non-empty line could not be parsed as a record and was skipped.
    MalformedRecord {
        /// The 1-based line number where the problem occurred.
        line_number: usize,
        /// What was wrong with the line.
        error: RecordError,
    },
}

impl Warning {
    /// Returns the line number associated with this warning.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedRecord { line_number, .. } => *line_number,
        }
    }

    /// Returns a human-readable description of the warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use atlas_flatfile::{RecordError, Warning};
    ///
    /// let warning = Warning::MalformedRecord {
    ///     line_number: 3,
    ///     error: RecordError::NoValues,
    /// };
    /// assert_eq!(warning.description(), "line 3: skipped: no values after separator");
    /// ```
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MalformedRecord { line_number, error } => {
                format!("line {line_number}: skipped: {error}")
            }
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}
