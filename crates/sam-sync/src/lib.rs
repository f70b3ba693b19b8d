//! # sam-sync
//!
//! Synchronizes one version of the medication formulary export into a
//! SQLite store.
//!
//! The [`SyncCoordinator`] drives a run through its phases: locate the
//! export files, prepare empty staging tables, parse and batch-upsert
//! each file, then gate-check and atomically swap the staging tables
//! over the live set. Interrupted runs resume from a JSON progress
//! checkpoint.

#![warn(missing_docs)]

pub mod coordinator;
pub mod download;
pub mod error;
pub mod importer;
pub mod progress;
pub mod schema;
pub mod store;

pub use coordinator::{SyncConfig, SyncCoordinator, SyncReport, DEFAULT_BATCH_SIZE};
pub use download::{Downloader, LocalDirDownloader};
pub use error::{SyncError, SyncResult};
pub use importer::{BatchImporter, ImportOutcome};
pub use progress::{Phase, SyncProgress};
pub use store::SamStore;
