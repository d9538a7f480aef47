//! Atomic write operations for flat files.
//!
//! Writing is split in two steps. Staging writes the full content to a
//! sibling file with a `.tmp` extension, flushes and closes it. Committing
//! renames the staged file over the target. Renames within one filesystem
//! are atomic on POSIX systems, so readers see either the old file or the
//! complete new one.
//!
//! Several files that must change together are all staged first and only
//! committed once every one of them was written. A failed staging step
//! leaves every target untouched.

use crate::error::Result;
use crate::record::Record;
use crate::writer::FlatWriter;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// A completely written temporary file waiting to replace its target.
///
/// Dropping a `StagedFile` without calling [`commit`](Self::commit) or
/// [`discard`](Self::discard) leaves the temporary file on disk.
#[derive(Debug)]
#[must_use = "a staged file replaces nothing until it is committed"]
pub struct StagedFile {
    temp_path: PathBuf,
    path: PathBuf,
}

impl StagedFile {
    /// The file this stage will replace.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renames the staged file over its target.
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails. The temporary file is removed
    /// and the target keeps its previous content.
    pub async fn commit(self) -> Result<()> {
        if let Err(e) = tokio::fs::rename(&self.temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&self.temp_path).await;
            return Err(e.into());
        }
        tracing::trace!(path = %self.path.display(), "Atomic write committed");
        Ok(())
    }

    /// Removes the staged file, leaving the target untouched.
    pub async fn discard(self) {
        let _ = tokio::fs::remove_file(&self.temp_path).await;
        tracing::trace!(path = %self.path.display(), "Staged write discarded");
    }
}

/// Writes records to a temporary sibling of an index file.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, a record cannot
/// be formatted or writing fails. The temporary file is removed in that case.
///
/// # Examples
///
/// ```no_run
/// use atlas_flatfile::{Record, stage_records};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let records = vec![Record::new("/srv/data", vec!["/home/u/data".to_string()])];
/// stage_records("/tmp/.atlas", ':', records).await?.commit().await?;
/// # Ok(())
/// # }
/// ```
pub async fn stage_records<P, I>(path: P, separator: char, records: I) -> Result<StagedFile>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Record>,
{
    let staged = StagedFile::for_target(path.as_ref());

    let result: Result<()> = async {
        let file = File::create(&staged.temp_path).await?;
        let mut writer = FlatWriter::new(file, separator);
        for record in records {
            writer.write_record(&record).await?;
        }
        writer.flush().await
    }
    .await;

    staged.finish(result).await
}

/// Writes one entry per line to a temporary sibling of a list file.
///
/// # Errors
///
/// See [`stage_records`].
pub async fn stage_entries<P, I, S>(path: P, entries: I) -> Result<StagedFile>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let staged = StagedFile::for_target(path.as_ref());

    let result: Result<()> = async {
        let file = File::create(&staged.temp_path).await?;
        // The separator is unused for plain entries.
        let mut writer = FlatWriter::new(file, crate::DEFAULT_SEPARATOR);
        for entry in entries {
            writer.write_entry(entry.as_ref()).await?;
        }
        writer.flush().await
    }
    .await;

    staged.finish(result).await
}

impl StagedFile {
    fn for_target(path: &Path) -> Self {
        Self {
            temp_path: make_temp_path(path),
            path: path.to_path_buf(),
        }
    }

    /// Keeps the stage if writing succeeded, removes the temp file otherwise.
    async fn finish(self, result: Result<()>) -> Result<Self> {
        match result {
            Ok(()) => Ok(self),
            Err(e) => {
                self.discard().await;
                Err(e)
            }
        }
    }
}

/// Builds the temporary sibling path used during an atomic write.
///
/// `.atlas` becomes `.atlas.tmp` and `dead_links.list` becomes
/// `dead_links.list.tmp`.
fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}
