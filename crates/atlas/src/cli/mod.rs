//! CLI argument parsing and command dispatch.
//!
//! The command line is a set of mutually exclusive mode flags followed by a
//! list of target paths.
//!
//! # Modes
//!
//! - check (default): report which symlinks would break if the targets change
//! - `--generate`: build a fresh index by scanning the targets
//! - `--update`: scan the targets and merge the result into the existing index
//! - `--delete`: remove every symlink that reaches the targets via the
//!   configured version-control delete command
//!
//! # Example
//!
//! ```bash
//! atlas --generate --atlas-path /var/tmp /srv/shared /home
//! atlas --atlas-path /var/tmp /srv/shared/datasets/old
//! atlas --update --atlas-path /var/tmp /home/newuser
//! ```

mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

pub use types::Mode;
pub use validators::{validate_separator, validate_target_path};

/// Atlas - find out what breaks before you change a path
///
/// Keeps a reverse index of every symbolic link under a set of directories,
/// mapping each real target to the links that point at it. Checking a path
/// reports every link that points at it or at any of its parent directories.
#[derive(Parser, Debug)]
#[command(name = "atlas")]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("mode")
        .args(["generate", "update", "delete"])
        .multiple(false)
))]
pub struct Cli {
    /// Show more detailed information
    #[arg(short, long)]
    pub verbose: bool,

    /// Scan the target paths and write a new atlas
    #[arg(short, long)]
    pub generate: bool,

    /// Scan the target paths and merge the result into the existing atlas
    #[arg(short, long)]
    pub update: bool,

    /// Remove the symlinks pointing at the target paths in version control
    #[arg(short, long)]
    pub delete: bool,

    /// Directory the atlas is read from and written to
    ///
    /// Defaults to the system temporary directory.
    #[arg(short = 'p', long, value_name = "PATH")]
    pub atlas_path: Option<PathBuf>,

    /// Character between a target and its links in the atlas file
    #[arg(short, long, value_parser = validate_separator)]
    pub separator: Option<char>,

    /// Output in JSON format for programmatic use
    #[arg(long)]
    pub json: bool,

    /// Paths to check, or directories to scan with --generate/--update
    #[arg(required = true, value_name = "TARGET_PATH", value_parser = validate_target_path)]
    pub targets: Vec<PathBuf>,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// The selected mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.generate {
            Mode::Generate
        } else if self.update {
            Mode::Update
        } else if self.delete {
            Mode::Delete
        } else {
            Mode::Check
        }
    }

    /// Directory holding the atlas files.
    #[must_use]
    pub fn atlas_dir(&self) -> PathBuf {
        self.atlas_path
            .clone()
            .unwrap_or_else(crate::app::default_atlas_dir)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Returns an error if the selected mode fails.
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        let app = App::from_directory(&self.atlas_dir(), self.separator).await?;
        let mode = self.mode();
        tracing::debug!(%mode, targets = self.targets.len(), "Running");

        match mode {
            Mode::Generate => execute::execute_generate(&app, &self.targets, output_mode).await,
            Mode::Update => execute::execute_update(&app, &self.targets, output_mode).await,
            Mode::Delete => execute::execute_delete(&app, &self.targets, output_mode).await,
            Mode::Check => execute::execute_check(&app, &self.targets, output_mode).await,
        }
    }
}
