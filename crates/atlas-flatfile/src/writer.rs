//! Flat file writing operations.
//!
//! This module provides async functionality for writing records and list
//! entries with buffering.

use crate::error::Result;
use crate::record::{Record, check_single_line};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Async writer for flat index and list files.
///
/// Each record or entry is written as one line followed by `\n`. Call
/// [`flush`](Self::flush) once done, buffered data is not written on drop.
///
/// # Examples
///
/// ```no_run
/// use atlas_flatfile::{FlatWriter, Record};
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::create("/tmp/.atlas").await?;
/// let mut writer = FlatWriter::new(file, ':');
/// writer
///     .write_record(&Record::new("/srv/data", vec!["/home/u/data".to_string()]))
///     .await?;
/// writer.flush().await?;
/// # Ok(())
/// # }
/// ```
pub struct FlatWriter<W> {
    writer: BufWriter<W>,
    separator: char,
}

impl<W: AsyncWrite + Unpin> FlatWriter<W> {
    /// Creates a new `FlatWriter` using `separator` between key and values.
    #[must_use]
    pub fn new(writer: W, separator: char) -> Self {
        Self {
            writer: BufWriter::new(writer),
            separator,
        }
    }

    /// Writes one record line.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be formatted or the write fails.
    pub async fn write_record(&mut self, record: &Record) -> Result<()> {
        let mut line = record.to_line(self.separator)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await?;
        Ok(())
    }

    /// Writes one plain list entry line.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry contains a line break or the write fails.
    pub async fn write_entry(&mut self, entry: &str) -> Result<()> {
        check_single_line(entry)?;
        self.writer.write_all(entry.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        Ok(())
    }

    /// Flushes buffered data to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Consumes the writer, returning the underlying buffered writer.
    ///
    /// This does not flush.
    #[must_use]
    pub fn into_inner(self) -> BufWriter<W> {
        self.writer
    }
}
