//! The sync coordinator: drives one export version through the
//! download, stage, import and finalize phases.
//!
//! Progress is checkpointed after each phase and each imported file.
//! A resumed run skips the files it already staged; the live tables
//! are only touched by the final staging swap, so an interrupted run
//! never leaves readers with a half-imported dataset.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Utc;
use sam_loader::{collect_records, SamFiles, SyncContext};
use sam_types::FileType;
use tracing::{info, warn};

use crate::download::Downloader;
use crate::error::{SyncError, SyncResult};
use crate::importer::BatchImporter;
use crate::progress::{Phase, SyncProgress};
use crate::schema::staging_name;
use crate::store::SamStore;

/// Default rows per multi-row upsert.
pub const DEFAULT_BATCH_SIZE: usize = 250;

/// Configuration of one sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Target database path.
    pub db_path: PathBuf,
    /// Progress checkpoint path.
    pub progress_path: PathBuf,
    /// Rows per multi-row upsert.
    pub batch_size: usize,
    /// Parse and count without writing or swapping.
    pub dry_run: bool,
    /// Pick up a previous interrupted run.
    pub resume: bool,
    /// File types that must be present for the run to proceed.
    pub required_files: Vec<FileType>,
}

impl SyncConfig {
    /// Configuration with all file types required.
    pub fn new<P: Into<PathBuf>>(db_path: P, progress_path: P) -> Self {
        SyncConfig {
            db_path: db_path.into(),
            progress_path: progress_path.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
            resume: false,
            required_files: FileType::ORDERED.to_vec(),
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Version stamp of the imported export.
    pub export_version: Option<String>,
    /// Rows per live table after the swap (staged counts on dry run).
    pub tables: BTreeMap<String, usize>,
    /// Dropped source elements, keyed by entity and reason.
    pub drops: BTreeMap<String, usize>,
    /// Parse and write errors tolerated during the run.
    pub errors: usize,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

/// Drives one sync run end to end.
pub struct SyncCoordinator<D: Downloader> {
    config: SyncConfig,
    downloader: D,
}

impl<D: Downloader> SyncCoordinator<D> {
    /// Creates a coordinator over a file source.
    pub fn new(config: SyncConfig, downloader: D) -> Self {
        SyncCoordinator { config, downloader }
    }

    /// Runs the sync to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if required files are missing, if any
    /// imported file left one of its target tables empty, or on
    /// unrecoverable database failures. The live tables are never
    /// modified on an error path.
    pub fn run(&mut self) -> SyncResult<SyncReport> {
        let mut progress = self.load_progress()?;
        let resuming = !progress.imported_files.is_empty();
        if resuming {
            info!(
                imported = progress.imported_files.len(),
                "resuming interrupted run"
            );
        }

        // Download.
        let files = self.downloader.fetch()?;
        let missing = files.missing_required(&self.config.required_files);
        if !missing.is_empty() {
            return Err(SyncError::MissingSourceFiles {
                files: missing
                    .iter()
                    .map(|f| f.prefix().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        progress.files_located = files.located.keys().copied().collect();
        progress.export_version = files.version.clone();
        progress.advance(Phase::Stage);
        self.checkpoint(&mut progress)?;
        info!(
            version = progress.export_version.as_deref().unwrap_or("unknown"),
            files = progress.files_located.len(),
            "export located"
        );

        // Stage.
        let mut store = SamStore::open(&self.config.db_path)?;
        store.ensure_schema()?;
        if resuming {
            store.ensure_staging()?;
        } else {
            store.reset_staging()?;
        }
        progress.advance(Phase::Import);
        self.checkpoint(&mut progress)?;

        // Import.
        let mut ctx = SyncContext::new(Utc::now().date_naive());
        self.reseed_validator(&store, &progress, &mut ctx)?;
        let importer = BatchImporter::new(self.config.batch_size, self.config.dry_run, ctx.today());
        for file_type in FileType::ORDERED {
            let Some(path) = files.path(file_type) else {
                continue;
            };
            if progress.is_imported(file_type) {
                info!(%file_type, "already imported, skipping");
                continue;
            }
            let parsed = collect_records(file_type, path, &mut ctx)?;
            let outcome = importer.import(&mut store, &parsed.records)?;
            for (table, written) in &outcome.written {
                *progress.table_counts.entry(table.clone()).or_insert(0) += written;
            }
            progress.errors += parsed.stats.xml_errors + outcome.failed;
            progress.imported_files.insert(file_type);
            self.checkpoint(&mut progress)?;
            info!(
                %file_type,
                rows = outcome.total_written(),
                expired = outcome.expired,
                deduplicated = outcome.deduplicated,
                failed = outcome.failed,
                "file imported"
            );
        }
        progress.advance(Phase::Finalize);
        self.checkpoint(&mut progress)?;

        for (what, count) in ctx.drops() {
            warn!(dropped = count, "{what}");
        }

        // Finalize.
        let mut tables = BTreeMap::new();
        if self.config.dry_run {
            // Dry run: the gate still judges the counted rows, only
            // the swap is skipped.
            check_gate(&files, |table| {
                Ok(progress.table_counts.get(table).copied().unwrap_or(0))
            })?;
            info!("dry run, gate passed, skipping swap");
            tables = progress.table_counts.clone();
        } else {
            check_gate(&files, |table| store.table_count(&staging_name(table)))?;
            store.swap_staging()?;
            for file_type in &progress.imported_files {
                for table in file_type.expected_tables() {
                    tables.insert(table.to_string(), store.table_count(table)?);
                }
            }
        }
        progress.advance(Phase::Done);
        self.checkpoint(&mut progress)?;

        Ok(SyncReport {
            export_version: progress.export_version.clone(),
            tables,
            drops: ctx.drops().clone(),
            errors: progress.errors,
            dry_run: self.config.dry_run,
        })
    }

    fn load_progress(&self) -> SyncResult<SyncProgress> {
        if self.config.resume {
            if let Some(progress) = SyncProgress::load(&self.config.progress_path)? {
                if progress.phase < Phase::Done {
                    return Ok(progress);
                }
            }
        }
        Ok(SyncProgress::new())
    }

    fn checkpoint(&self, progress: &mut SyncProgress) -> SyncResult<()> {
        if self.config.dry_run {
            return Ok(());
        }
        progress.save(&self.config.progress_path)
    }

    /// On resume past the AMP file, the cross-file validator set is
    /// rebuilt from the DMPP keys the interrupted run already staged.
    fn reseed_validator(
        &self,
        store: &SamStore,
        progress: &SyncProgress,
        ctx: &mut SyncContext,
    ) -> SyncResult<()> {
        if !progress.is_imported(FileType::AmpHierarchy)
            || progress.is_imported(FileType::Reimbursement)
        {
            return Ok(());
        }
        for (code, environment) in store.staged_dmpp_keys()? {
            ctx.register_dmpp(&code, &environment);
        }
        info!(keys = ctx.dmpp_count(), "validator set reseeded from staging");
        Ok(())
    }
}

/// All-or-nothing gate: every table a located file populates must
/// show at least one row this run before the swap may happen.
fn check_gate(
    files: &SamFiles,
    count: impl Fn(&str) -> SyncResult<usize>,
) -> SyncResult<()> {
    let mut empty = Vec::new();
    for file_type in files.located.keys() {
        for table in file_type.expected_tables() {
            if count(table)? == 0 {
                empty.push(*table);
            }
        }
    }
    if empty.is_empty() {
        Ok(())
    } else {
        Err(SyncError::IncompleteRun {
            tables: empty.join(", "),
        })
    }
}
