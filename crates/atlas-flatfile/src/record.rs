//! Parsing and formatting of single index records.
//!
//! A record line looks like `key:value1 value2 value3 `. The key is
//! everything before the first separator, while the values come from the
//! text after the last separator split on whitespace. A key or value that
//! itself contains the separator does not survive a round trip, so pick a
//! separator that never appears in paths.

use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;

/// Separator used between the key and the value list when none is configured.
pub const DEFAULT_SEPARATOR: char = ':';

/// One key and its values, as stored on a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Text before the first separator.
    pub key: String,
    /// Whitespace-separated entries after the last separator.
    pub values: Vec<String>,
}

/// Why a line could not be turned into a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    /// The line has no separator at all.
    MissingSeparator,
    /// Nothing precedes the first separator.
    EmptyKey,
    /// Nothing but whitespace follows the last separator.
    NoValues,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "missing separator"),
            Self::EmptyKey => write!(f, "empty key"),
            Self::NoValues => write!(f, "no values after separator"),
        }
    }
}

impl std::error::Error for RecordError {}

impl Record {
    /// Creates a record from a key and its values.
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    /// Parses one line using the first/last separator rule.
    ///
    /// Leading and trailing whitespace on the line is ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`RecordError`] when the line has no separator, an empty
    /// key or no values.
    ///
    /// # Examples
    ///
    /// ```
    /// use atlas_flatfile::Record;
    ///
    /// let record = Record::parse("/srv/data:/home/a/data /home/b/data ", ':').unwrap();
    /// assert_eq!(record.key, "/srv/data");
    /// assert_eq!(record.values, vec!["/home/a/data", "/home/b/data"]);
    /// ```
    pub fn parse(line: &str, separator: char) -> std::result::Result<Self, RecordError> {
        let line = line.trim();
        let (key, _) = line
            .split_once(separator)
            .ok_or(RecordError::MissingSeparator)?;
        if key.is_empty() {
            return Err(RecordError::EmptyKey);
        }
        let (_, tail) = line
            .rsplit_once(separator)
            .ok_or(RecordError::MissingSeparator)?;
        let values: Vec<String> = tail.split_whitespace().map(str::to_string).collect();
        if values.is_empty() {
            return Err(RecordError::NoValues);
        }
        Ok(Self::new(key, values))
    }

    /// Formats the record as a line without the trailing newline.
    ///
    /// Every value is followed by a single space, so the output of a record
    /// with values `a` and `b` under key `k` is `k:a b `.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the key is empty or any field
    /// contains a line break, since such a line could not be read back.
    pub fn to_line(&self, separator: char) -> Result<String> {
        if self.key.is_empty() {
            return Err(Error::InvalidFormat("record key is empty".to_string()));
        }
        check_single_line(&self.key)?;

        let mut line = String::with_capacity(
            self.key.len() + 1 + self.values.iter().map(|v| v.len() + 1).sum::<usize>(),
        );
        line.push_str(&self.key);
        line.push(separator);
        for value in &self.values {
            check_single_line(value)?;
            line.push_str(value);
            line.push(' ');
        }
        Ok(line)
    }
}

/// Borrows a path as UTF-8 text for writing.
///
/// # Errors
///
/// Returns [`Error::NonUtf8Path`] if the path is not valid UTF-8.
pub fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))
}

pub(crate) fn check_single_line(field: &str) -> Result<()> {
    if field.contains(['\n', '\r']) {
        return Err(Error::InvalidFormat(format!(
            "field contains a line break: {field:?}"
        )));
    }
    Ok(())
}
