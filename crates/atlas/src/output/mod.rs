//! Output formatting for CLI commands.
//!
//! Every report can be printed as human-readable text or as JSON for
//! programmatic use. Text writers take any [`Write`] so they can be tested
//! against a buffer.
//!
//! Submodules:
//! - [`color`]: semantic color helpers

pub mod color;

use crate::query::{QueryReport, TargetStatus};
use crate::remove::RemovalSummary;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

pub use color::{error, info, success, warning};

use color::dimmed;

// ============================================================================
// Output Configuration
// ============================================================================

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `NO_COLOR`: any value disables colors
    /// - `ATLAS_COLOR`: set to "0" or "false" to disable colors
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create an `OutputConfig` from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // https://no-color.org/
        let use_colors = lookup("NO_COLOR").is_none()
            && lookup("ATLAS_COLOR")
                .is_none_or(|v| v != "0" && !v.eq_ignore_ascii_case("false"));
        Self { use_colors }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Outcome of a generate or update run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Written index file.
    pub index_file: PathBuf,
    /// Written dead-link list.
    pub dead_links_file: PathBuf,
    /// Distinct targets in the saved index.
    pub targets: usize,
    /// Total links in the saved index.
    pub links: usize,
    /// Entries in the saved dead-link list.
    pub dead_links: usize,
    /// Scan roots that did not exist.
    pub skipped_roots: Vec<PathBuf>,
    /// Symlinks that could not be resolved.
    pub unresolved: Vec<PathBuf>,
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print a query report in the specified format
pub fn print_query_report(report: &QueryReport, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();

    match mode {
        OutputMode::Text => write_query_text(&mut handle, report, &config),
        OutputMode::Json => write_json(&mut handle, report),
    }
}

/// Print the outcome of a generate or update run
pub fn print_scan_summary(summary: &ScanSummary, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();

    match mode {
        OutputMode::Text => write_scan_text(&mut handle, summary, &config),
        OutputMode::Json => write_json(&mut handle, summary),
    }
}

/// Print the outcome of a delete run
pub fn print_removal_summary(summary: &RemovalSummary, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();

    match mode {
        OutputMode::Text => write_removal_text(&mut handle, summary, &config),
        OutputMode::Json => write_json(&mut handle, summary),
    }
}

/// Print a simple message
pub fn print_message(msg: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{msg}")
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value)
}

// ============================================================================
// Formatting
// ============================================================================

fn write_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{json}")
}

fn write_query_text<W: Write>(
    w: &mut W,
    report: &QueryReport,
    config: &OutputConfig,
) -> io::Result<()> {
    for target in &report.targets {
        let requested = target.requested.display().to_string();
        match target.status {
            TargetStatus::Missing => {
                let line = format!("'{requested}' does not exist, or it is a dead symbolic link");
                writeln!(w, "{}", error(&line, config))?;
            }
            TargetStatus::Free => {
                let line = format!("Nothing linked to '{requested}', you are free to go.");
                writeln!(w, "{}", success(&line, config))?;
            }
            TargetStatus::Linked => {
                let line =
                    format!("If you modify '{requested}', the following will be affected:");
                writeln!(w, "{}", warning(&line, config))?;
                for hit in &target.hits {
                    let level = hit.level.display().to_string();
                    writeln!(w, "\t{}\t[target]", info(&level, config))?;
                    for link in &hit.links {
                        writeln!(w, "\t{}", link.display())?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn write_scan_text<W: Write>(
    w: &mut W,
    summary: &ScanSummary,
    config: &OutputConfig,
) -> io::Result<()> {
    for root in &summary.skipped_roots {
        let line = format!("'{}' does not exist, ignored", root.display());
        writeln!(w, "{}", warning(&line, config))?;
    }
    for link in &summary.unresolved {
        let line = format!("'{}' could not be resolved, skipped", link.display());
        writeln!(w, "{}", warning(&line, config))?;
    }

    let counts = format!("({} targets, {} links)", summary.targets, summary.links);
    writeln!(
        w,
        "Atlas written to '{}' {}",
        summary.index_file.display(),
        dimmed(&counts, config)
    )?;
    if summary.dead_links > 0 {
        let line = format!(
            "{} dead links found, written in '{}'",
            summary.dead_links,
            summary.dead_links_file.display()
        );
        writeln!(w, "{}", warning(&line, config))?;
    }
    Ok(())
}

fn write_removal_text<W: Write>(
    w: &mut W,
    summary: &RemovalSummary,
    config: &OutputConfig,
) -> io::Result<()> {
    for link in &summary.removed {
        let line = format!("Removed '{}'", link.display());
        writeln!(w, "{}", success(&line, config))?;
    }
    for (link, reason) in &summary.failed {
        let line = format!("Failed to remove '{}': {reason}", link.display());
        writeln!(w, "{}", error(&line, config))?;
    }
    if !summary.removed.is_empty() {
        writeln!(
            w,
            "{}",
            dimmed("Removal is pending in version control; submit the change manually.", config)
        )?;
    }
    Ok(())
}
