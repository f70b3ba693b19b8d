//! Sync-specific error and result types.

use thiserror::Error;

/// Errors raised while importing an export version into the store.
#[derive(Error, Debug)]
pub enum SyncError {
    /// I/O error on the progress file or export directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite error.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Progress file could not be read or written.
    #[error("progress file error: {0}")]
    Json(#[from] serde_json::Error),

    /// Export file parsing failed.
    #[error("loader error: {0}")]
    Loader(#[from] sam_loader::LoaderError),

    /// Required export files are absent from the source directory.
    #[error("missing required export files: {files}")]
    MissingSourceFiles {
        /// Comma-joined prefixes of the missing files.
        files: String,
    },

    /// The all-or-nothing gate rejected the staged run.
    #[error("staged run is incomplete, empty tables: {tables}")]
    IncompleteRun {
        /// Comma-joined names of the tables with no rows.
        tables: String,
    },

    /// A batch kept failing after all retry attempts.
    #[error("database write failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// Attempts made.
        attempts: u32,
        /// The final SQLite error.
        source: rusqlite::Error,
    },
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
