//! Persisted run progress.
//!
//! The coordinator checkpoints a small JSON document after every
//! phase and every imported file, so an interrupted run can resume
//! without re-importing the files it already staged.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use sam_types::FileType;
use serde::{Deserialize, Serialize};

use crate::error::SyncResult;

/// Phases of one sync run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    /// Locating (or fetching) the export files.
    Download,
    /// Preparing empty staging tables.
    Stage,
    /// Parsing and importing export files.
    Import,
    /// Gate check and staging swap.
    Finalize,
    /// The run completed and its tables are live.
    Done,
}

/// Checkpointed state of one sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncProgress {
    /// Current phase.
    pub phase: Phase,
    /// Version stamp extracted from the export filenames.
    pub export_version: Option<String>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Last checkpoint time.
    pub updated_at: DateTime<Utc>,
    /// File types located during the download phase.
    pub files_located: BTreeSet<FileType>,
    /// File types fully imported into staging.
    pub imported_files: BTreeSet<FileType>,
    /// Rows staged per table.
    pub table_counts: BTreeMap<String, usize>,
    /// Parse and write errors tolerated so far.
    pub errors: usize,
}

impl SyncProgress {
    /// Fresh progress for a run starting now.
    pub fn new() -> Self {
        let now = Utc::now();
        SyncProgress {
            phase: Phase::Download,
            export_version: None,
            started_at: now,
            updated_at: now,
            files_located: BTreeSet::new(),
            imported_files: BTreeSet::new(),
            table_counts: BTreeMap::new(),
            errors: 0,
        }
    }

    /// Loads progress from `path`, or `None` if no file exists.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or
    /// parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> SyncResult<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Writes a checkpoint to `path`, updating `updated_at`.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> SyncResult<()> {
        self.updated_at = Utc::now();
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Advances to a later phase; never moves backwards.
    pub fn advance(&mut self, phase: Phase) {
        if phase > self.phase {
            self.phase = phase;
        }
    }

    /// Whether a file type was already imported by this run.
    pub fn is_imported(&self, file_type: FileType) -> bool {
        self.imported_files.contains(&file_type)
    }
}

impl Default for SyncProgress {
    fn default() -> Self {
        Self::new()
    }
}
