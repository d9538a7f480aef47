//! Command execution logic.
//!
//! One function per mode. Each loads what it needs through the [`App`],
//! runs the core operation and prints the outcome.

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

use crate::app::App;
use crate::error::Error;
use crate::output::{self, OutputMode, ScanSummary};
use crate::scanner::ScanReport;
use crate::storage::SavedFiles;
use atlas_flatfile::Warning;

/// Execute generate mode
pub async fn execute_generate(app: &App, roots: &[PathBuf], output_mode: OutputMode) -> Result<()> {
    let report = scan(app, roots).await?;
    if report.skipped_roots.len() >= roots.len() {
        return Err(Error::InvalidInput(
            "none of the given paths exist, nothing was scanned and the atlas was left unchanged"
                .to_string(),
        )
        .into());
    }

    let saved = app.store().save(&report.index, &report.dead_links).await?;
    output::print_scan_summary(&summarize(&report, saved), output_mode)?;
    Ok(())
}

/// Execute update mode
pub async fn execute_update(app: &App, roots: &[PathBuf], output_mode: OutputMode) -> Result<()> {
    use crate::merge::{merge_dead_links, merge_indices};

    let loaded = app.store().load().await?;
    log_load_warnings(app.store().index_path().as_path(), &loaded.warnings);

    let mut report = scan(app, roots).await?;
    report.index = merge_indices(loaded.index, [std::mem::take(&mut report.index)]);
    report.dead_links = merge_dead_links([
        loaded.dead_links,
        std::mem::take(&mut report.dead_links),
    ]);

    let saved = app.store().save(&report.index, &report.dead_links).await?;
    output::print_scan_summary(&summarize(&report, saved), output_mode)?;
    if output_mode == OutputMode::Text {
        output::print_message("Update complete.")?;
    }
    Ok(())
}

/// Execute check mode
pub async fn execute_check(app: &App, targets: &[PathBuf], output_mode: OutputMode) -> Result<()> {
    let (index, warnings) = app.store().load_index().await?;
    log_load_warnings(app.store().index_path().as_path(), &warnings);

    let report = crate::query::query(&index, targets)?;
    output::print_query_report(&report, output_mode)?;
    Ok(())
}

/// Execute delete mode
///
/// Every affected link is handed to the configured remove command. A
/// failure for one link does not stop the others, but makes the run fail.
pub async fn execute_delete(app: &App, targets: &[PathBuf], output_mode: OutputMode) -> Result<()> {
    use crate::remove::remove_all;

    let remover = app.remover()?;
    let (index, warnings) = app.store().load_index().await?;
    log_load_warnings(app.store().index_path().as_path(), &warnings);

    let report = crate::query::query(&index, targets)?;
    let affected = report.affected();
    tracing::warn!(
        links = affected.len(),
        command = %app.config().remove_command.join(" "),
        "Delete mode: affected symlinks will be removed"
    );

    let summary = remove_all(&remover, &affected);

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "query": report,
                "removal": summary,
            }))?;
        }
        OutputMode::Text => {
            output::print_query_report(&report, output_mode)?;
            if affected.is_empty() {
                output::print_message("Nothing to remove.")?;
            } else {
                output::print_removal_summary(&summary, output_mode)?;
            }
        }
    }

    if !summary.failed.is_empty() {
        bail!(
            "{} of {} links could not be removed",
            summary.failed.len(),
            summary.failed.len() + summary.removed.len()
        );
    }
    Ok(())
}

/// Runs the blocking filesystem walk off the async runtime.
async fn scan(app: &App, roots: &[PathBuf]) -> Result<ScanReport> {
    let scanner = app.scanner();
    let roots = roots.to_vec();
    let report = tokio::task::spawn_blocking(move || scanner.scan(&roots)).await?;

    tracing::debug!(
        entries = report.entries_seen,
        targets = report.index.len(),
        dead = report.dead_links.len(),
        "Scan finished"
    );
    Ok(report)
}

fn summarize(report: &ScanReport, saved: SavedFiles) -> ScanSummary {
    ScanSummary {
        index_file: saved.index_file,
        dead_links_file: saved.dead_links_file,
        targets: report.index.len(),
        links: report.index.link_count(),
        dead_links: report.dead_links.len(),
        skipped_roots: report.skipped_roots.clone(),
        unresolved: report.unresolved.clone(),
    }
}

fn log_load_warnings(file: &Path, warnings: &[Warning]) {
    for warning in warnings {
        tracing::warn!(
            file = %file.display(),
            line = warning.line_number(),
            "{}",
            warning.description()
        );
    }
}
