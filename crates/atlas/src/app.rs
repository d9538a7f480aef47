//! Application context for CLI command execution.
//!
//! This module provides the `App` struct that ties the atlas directory, its
//! configuration and the persisted store together.
//!
//! # Example
//!
//! ```no_run
//! use atlas::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new("/tmp"), None).await?;
//!     let (index, _warnings) = app.store().load_index().await?;
//!     println!("{} targets", index.len());
//!     Ok(())
//! }
//! ```

use crate::config::{AtlasConfig, validate_separator};
use crate::error::{Error, Result};
use crate::remove::CommandRemover;
use crate::scanner::Scanner;
use crate::storage::Store;
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
#[derive(Debug)]
pub struct App {
    /// Persisted index and dead-link files
    store: Store,

    /// Settings after command-line overrides
    config: AtlasConfig,
}

impl App {
    /// Create an App for the given atlas directory.
    ///
    /// Loads `atlas.yaml` from the directory if present, then applies the
    /// separator override from the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is invalid or the
    /// override separator is rejected.
    pub async fn from_directory(atlas_dir: &Path, separator: Option<char>) -> Result<Self> {
        let mut config = AtlasConfig::load_from_dir(atlas_dir).await?;
        if let Some(separator) = separator {
            config.separator = validate_separator(separator).map_err(Error::InvalidInput)?;
        }

        tracing::debug!(
            dir = %atlas_dir.display(),
            separator = %config.separator,
            "Atlas directory opened"
        );

        Ok(Self {
            store: Store::new(atlas_dir, config.separator),
            config,
        })
    }

    /// Get the persisted store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Get the effective configuration.
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Get the path to the atlas directory.
    pub fn atlas_dir(&self) -> &Path {
        self.store.dir()
    }

    /// A scanner using the configured liveness interval.
    pub fn scanner(&self) -> Scanner {
        Scanner::new().with_alive_interval(self.config.alive_interval())
    }

    /// The configured link remover.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured command is empty.
    pub fn remover(&self) -> Result<CommandRemover> {
        CommandRemover::from_command(&self.config.remove_command)
    }
}

/// Directory used when no atlas path is given.
#[must_use]
pub fn default_atlas_dir() -> PathBuf {
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CONFIG_FILE_NAME;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn app_uses_defaults_without_config_file() {
        let dir = TempDir::new().unwrap();

        let app = App::from_directory(dir.path(), None).await.unwrap();

        assert_eq!(app.config(), &AtlasConfig::default());
        assert_eq!(app.atlas_dir(), dir.path());
        assert_eq!(app.store().index_path(), dir.path().join(".atlas"));
    }

    #[tokio::test]
    async fn separator_flag_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "separator: ';'\nalive-interval-secs: 7\n",
        )
        .unwrap();

        let app = App::from_directory(dir.path(), Some('|')).await.unwrap();

        assert_eq!(app.config().separator, '|');
        assert_eq!(app.config().alive_interval(), Duration::from_secs(7));
    }

    #[tokio::test]
    async fn whitespace_separator_flag_is_invalid_input() {
        let dir = TempDir::new().unwrap();
        let result = App::from_directory(dir.path(), Some(' ')).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn missing_directory_still_opens() {
        let dir = TempDir::new().unwrap();
        let app = App::from_directory(&dir.path().join("absent"), None).await;
        assert!(app.is_ok());
    }
}
