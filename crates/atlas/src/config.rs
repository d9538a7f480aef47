//! Configuration management for atlas.
//!
//! Settings are read from an optional `atlas.yaml` in the atlas directory.
//! Command-line flags override whatever the file says.

use crate::domain::CONFIG_FILE_NAME;
use crate::error::{Error, Result};
use crate::scanner::DEFAULT_ALIVE_INTERVAL;
use atlas_flatfile::DEFAULT_SEPARATOR;
use serde::Deserialize;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio::fs;

/// Command used to remove links when none is configured.
pub const DEFAULT_REMOVE_COMMAND: [&str; 2] = ["p4", "delete"];

/// Contents of `atlas.yaml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AtlasConfig {
    /// Character between a target and its links in the index file.
    pub separator: char,

    /// Seconds between liveness messages during long scans.
    pub alive_interval_secs: u64,

    /// Program and leading arguments run to remove a link. The link's file
    /// name is appended and the command runs in the link's parent directory.
    pub remove_command: Vec<String>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            alive_interval_secs: DEFAULT_ALIVE_INTERVAL.as_secs(),
            remove_command: DEFAULT_REMOVE_COMMAND.map(String::from).to_vec(),
        }
    }
}

impl AtlasConfig {
    /// Loads configuration from a YAML file and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// holds invalid values.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `atlas.yaml` from `dir`, or the defaults if there is none.
    ///
    /// # Errors
    ///
    /// See [`AtlasConfig::load`].
    pub async fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        match fs::metadata(&path).await {
            Ok(_) => {
                tracing::debug!(path = %path.display(), "Loading configuration");
                Self::load(&path).await
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a whitespace separator or an empty
    /// remove command.
    pub fn validate(&self) -> Result<()> {
        validate_separator(self.separator).map_err(Error::Config)?;
        if self.remove_command.first().is_none_or(String::is_empty) {
            return Err(Error::Config(
                "remove-command must name a program".to_string(),
            ));
        }
        Ok(())
    }

    /// Liveness interval as a [`Duration`].
    #[must_use]
    pub fn alive_interval(&self) -> Duration {
        Duration::from_secs(self.alive_interval_secs)
    }
}

/// Validates a separator character.
///
/// Whitespace would collide with the space between links, and a line break
/// would split records.
///
/// # Errors
///
/// Returns a message describing the problem.
pub fn validate_separator(separator: char) -> std::result::Result<char, String> {
    if separator.is_whitespace() {
        return Err(format!(
            "Separator cannot be whitespace, got {separator:?}"
        ));
    }
    if separator.is_control() {
        return Err(format!(
            "Separator cannot be a control character, got {separator:?}"
        ));
    }
    Ok(separator)
}
