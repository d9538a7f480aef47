//! Line-oriented flat file codec for the atlas symlink index.
//!
//! An index file holds one record per line: a key, a single separator
//! character, then whitespace-separated values. A list file holds one entry
//! per line. This crate provides parsing and formatting of those lines,
//! buffered async reading and writing, and crash-safe atomic writes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod record;
pub mod warning;
pub mod writer;

pub use atomic::{StagedFile, stage_entries, stage_records};
pub use error::{Error, Result};
pub use reader::FlatReader;
pub use record::{DEFAULT_SEPARATOR, Record, RecordError, path_str};
pub use warning::Warning;
pub use writer::FlatWriter;
