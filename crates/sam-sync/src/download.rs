//! Export acquisition.
//!
//! The coordinator is agnostic about where export files come from; a
//! [`Downloader`] hands it a set of located files. The default
//! implementation reads an already-unpacked local directory.

use std::path::PathBuf;

use sam_loader::{discover_sam_files, SamFiles};

use crate::error::SyncResult;

/// Source of export files for one run.
pub trait Downloader {
    /// Locates (or fetches) the export files.
    ///
    /// # Errors
    /// Returns an error if the source is unreachable.
    fn fetch(&self) -> SyncResult<SamFiles>;
}

/// Reads export files from an unpacked local directory.
pub struct LocalDirDownloader {
    dir: PathBuf,
}

impl LocalDirDownloader {
    /// Uses `dir` as the export source.
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        LocalDirDownloader { dir: dir.into() }
    }
}

impl Downloader for LocalDirDownloader {
    fn fetch(&self) -> SyncResult<SamFiles> {
        Ok(discover_sam_files(&self.dir)?)
    }
}
