//! Flat file reading operations.
//!
//! This module provides async functionality for reading index and list files
//! line-by-line with buffering and line number tracking for warnings.

use crate::error::Result;
use crate::record::Record;
use crate::warning::Warning;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Async reader for flat index and list files.
///
/// `FlatReader` wraps an async reader in a [`BufReader`] and hands out
/// trimmed, non-blank lines. Line numbers count every physical line,
/// blank ones included, so warnings point at the right place in the file.
///
/// # Examples
///
/// ```no_run
/// use atlas_flatfile::FlatReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("/tmp/.atlas").await?;
/// let mut reader = FlatReader::new(file);
/// let (records, warnings) = reader.read_records(':').await?;
/// # Ok(())
/// # }
/// ```
pub struct FlatReader<R> {
    reader: BufReader<R>,
    /// 1-based number of the last physical line read, 0 before any read.
    line_number: usize,
    buf: String,
}

impl<R: AsyncRead + Unpin> FlatReader<R> {
    /// Creates a new `FlatReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buf: String::new(),
        }
    }

    /// Returns the number of the last physical line read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next non-blank line, trimmed of surrounding whitespace.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the input is not valid UTF-8.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            self.buf.clear();
            let read = self.reader.read_line(&mut self.buf).await?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = self.buf.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
    }

    /// Reads every remaining line as a [`Record`].
    ///
    /// Lines that fail to parse are skipped and returned as warnings.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures; malformed lines never fail
    /// the whole read.
    pub async fn read_records(&mut self, separator: char) -> Result<(Vec<Record>, Vec<Warning>)> {
        let mut records = Vec::new();
        let mut warnings = Vec::new();

        while let Some(line) = self.next_line().await? {
            match Record::parse(&line, separator) {
                Ok(record) => records.push(record),
                Err(error) => {
                    tracing::debug!(line_number = self.line_number, %error, "Skipping malformed record");
                    warnings.push(Warning::MalformedRecord {
                        line_number: self.line_number,
                        error,
                    });
                }
            }
        }

        Ok((records, warnings))
    }

    /// Reads every remaining non-blank line as a list entry.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub async fn read_entries(&mut self) -> Result<Vec<String>> {
        let mut entries = Vec::new();
        while let Some(line) = self.next_line().await? {
            entries.push(line);
        }
        Ok(entries)
    }
}
