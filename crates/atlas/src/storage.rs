//! Flat-file persistence for the index and the dead-link list.
//!
//! Both files live in one atlas directory: the index in `.atlas` and dead
//! links in `dead_links.list`. Saves always write both files, even when they
//! are empty, and go through an atomic temp-file rename so an interrupted
//! save never leaves a truncated index behind.

use crate::domain::{DEAD_LINKS_FILE_NAME, DeadLinks, INDEX_FILE_NAME, Index};
use crate::error::{Error, Result};
use atlas_flatfile::{
    FlatReader, Record, Warning, path_str, stage_entries, stage_records,
};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs::File;

/// Everything read back from an atlas directory.
#[derive(Debug, Default)]
pub struct Loaded {
    /// The persisted index.
    pub index: Index,
    /// The persisted dead links.
    pub dead_links: DeadLinks,
    /// Lines that were skipped while reading the index.
    pub warnings: Vec<Warning>,
}

/// Paths written by a successful [`Store::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFiles {
    /// The index file.
    pub index_file: PathBuf,
    /// The dead-link list.
    pub dead_links_file: PathBuf,
}

/// Reads and writes the persisted files in one atlas directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
    separator: char,
}

impl Store {
    /// Creates a store rooted at `dir` using `separator` in the index file.
    pub fn new(dir: impl Into<PathBuf>, separator: char) -> Self {
        Self {
            dir: dir.into(),
            separator,
        }
    }

    /// The atlas directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the index file.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE_NAME)
    }

    /// Path of the dead-link list.
    #[must_use]
    pub fn dead_links_path(&self) -> PathBuf {
        self.dir.join(DEAD_LINKS_FILE_NAME)
    }

    /// Writes the index and the dead-link list, both sorted.
    ///
    /// Both files are staged completely before either replaces its previous
    /// version, so a failure while formatting or writing leaves both files
    /// as they were.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be written, or if a path is not
    /// valid UTF-8 or contains a line break.
    pub async fn save(&self, index: &Index, dead_links: &DeadLinks) -> Result<SavedFiles> {
        let start = Instant::now();
        let index_file = self.index_path();
        let dead_links_file = self.dead_links_path();

        let records = index
            .sorted_entries()
            .into_iter()
            .map(|(target, links)| -> atlas_flatfile::Result<Record> {
                let values = links
                    .into_iter()
                    .map(|link| path_str(link).map(str::to_string))
                    .collect::<atlas_flatfile::Result<Vec<_>>>()?;
                Ok(Record::new(path_str(target)?, values))
            })
            .collect::<atlas_flatfile::Result<Vec<_>>>()?;
        let entries = dead_links
            .sorted()
            .into_iter()
            .map(path_str)
            .collect::<atlas_flatfile::Result<Vec<_>>>()?;

        let staged_index = stage_records(&index_file, self.separator, records).await?;
        let staged_dead = match stage_entries(&dead_links_file, entries).await {
            Ok(staged) => staged,
            Err(e) => {
                staged_index.discard().await;
                return Err(e.into());
            }
        };

        if let Err(e) = staged_index.commit().await {
            staged_dead.discard().await;
            return Err(e.into());
        }
        staged_dead.commit().await?;

        tracing::debug!(
            index = %index_file.display(),
            targets = index.len(),
            dead_links = dead_links.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Atlas written"
        );

        Ok(SavedFiles {
            index_file,
            dead_links_file,
        })
    }

    /// Reads the index and the dead-link list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if either file is missing, or an I/O error
    /// if reading fails.
    pub async fn load(&self) -> Result<Loaded> {
        let (index, warnings) = self.load_index().await?;
        let dead_links = self.load_dead_links().await?;
        Ok(Loaded {
            index,
            dead_links,
            warnings,
        })
    }

    /// Reads only the index, returning skipped lines as warnings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the index file is missing.
    pub async fn load_index(&self) -> Result<(Index, Vec<Warning>)> {
        let start = Instant::now();
        let path = self.index_path();
        let mut reader = FlatReader::new(open(&path).await?);
        let (records, warnings) = reader.read_records(self.separator).await?;

        let mut index = Index::new();
        for record in records {
            for link in record.values {
                index.insert(&record.key, link);
            }
        }

        tracing::debug!(
            path = %path.display(),
            targets = index.len(),
            skipped = warnings.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Atlas read"
        );
        Ok((index, warnings))
    }

    /// Reads only the dead-link list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the list file is missing.
    pub async fn load_dead_links(&self) -> Result<DeadLinks> {
        let path = self.dead_links_path();
        let mut reader = FlatReader::new(open(&path).await?);
        Ok(reader.read_entries().await?.into_iter().collect())
    }
}

async fn open(path: &Path) -> Result<File> {
    File::open(path).await.map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io(e),
    })
}
