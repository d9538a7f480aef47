//! Atlas CLI binary.

use anyhow::Result;
use atlas::cli::Cli;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "atlas=info,atlas_flatfile=info";
const VERBOSE_FILTER: &str = "atlas=debug,atlas_flatfile=debug";

/// Main entry point for the atlas CLI.
///
/// Scanning runs on the blocking pool; the current_thread runtime only
/// drives file persistence.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // RUST_LOG wins over --verbose, e.g. RUST_LOG=atlas=trace
    let fallback = if cli.verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting atlas CLI");
    cli.execute().await?;
    tracing::debug!("Atlas CLI completed successfully");
    Ok(())
}
