//! Formulary sync binary.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sam_sync::{LocalDirDownloader, SyncConfig, SyncCoordinator, DEFAULT_BATCH_SIZE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Import a medication formulary export into a SQLite store.
#[derive(Parser, Debug)]
#[command(name = "sam-sync", version, about)]
struct Args {
    /// Directory holding the unpacked export files.
    #[arg(long)]
    source_dir: PathBuf,

    /// Target SQLite database.
    #[arg(long, default_value = "sam.db")]
    db: PathBuf,

    /// Progress checkpoint file.
    #[arg(long, default_value = "sam-sync-progress.json")]
    progress: PathBuf,

    /// Rows per multi-row upsert.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Parse and count without writing or swapping.
    #[arg(long)]
    dry_run: bool,

    /// Pick up a previous interrupted run.
    #[arg(long)]
    resume: bool,

    /// Enable debug logging.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let mut config = SyncConfig::new(args.db, args.progress);
    config.batch_size = args.batch_size;
    config.dry_run = args.dry_run;
    config.resume = args.resume;

    let mut coordinator = SyncCoordinator::new(config, LocalDirDownloader::new(args.source_dir));
    let report = coordinator.run().context("sync failed")?;

    let total: usize = report.tables.values().sum();
    tracing::info!(
        version = report.export_version.as_deref().unwrap_or("unknown"),
        tables = report.tables.len(),
        rows = total,
        errors = report.errors,
        dry_run = report.dry_run,
        "sync complete"
    );
    Ok(())
}
