//! Export file discovery.
//!
//! An unpacked export directory holds one XML file per dataset, named
//! `<PREFIX>-<version>.xml` (for example `AMP-1.37.2.xml`). Discovery
//! maps each known prefix to its path and lifts the export version
//! stamp out of the filenames.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use sam_types::FileType;
use tracing::debug;

use crate::types::{LoaderError, LoaderResult};

/// The export files located in one directory.
#[derive(Debug, Clone, Default)]
pub struct SamFiles {
    /// Path per located file type.
    pub located: BTreeMap<FileType, PathBuf>,
    /// Version stamp shared by the located filenames, if any.
    pub version: Option<String>,
}

impl SamFiles {
    /// Path of a located file type.
    pub fn path(&self, file_type: FileType) -> Option<&Path> {
        self.located.get(&file_type).map(PathBuf::as_path)
    }

    /// The required file types that were not located.
    pub fn missing_required(&self, required: &[FileType]) -> Vec<FileType> {
        required
            .iter()
            .copied()
            .filter(|file_type| !self.located.contains_key(file_type))
            .collect()
    }
}

/// Scans a directory for export files.
///
/// Unknown files are ignored; when several files share a prefix the
/// lexicographically greatest name wins, which for dotted version
/// stamps is the most recent export.
///
/// # Errors
///
/// Returns [`LoaderError::DirectoryNotFound`] if `path` does not
/// exist, and I/O errors from reading the directory.
pub fn discover_sam_files<P: AsRef<Path>>(path: P) -> LoaderResult<SamFiles> {
    let path = path.as_ref();
    if !path.is_dir() {
        return Err(LoaderError::DirectoryNotFound {
            path: path.display().to_string(),
        });
    }

    let mut names: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.to_ascii_lowercase().ends_with(".xml") {
            names.push((name, entry.path()));
        }
    }
    names.sort();

    let mut files = SamFiles::default();
    for (name, file_path) in names {
        let Some(file_type) = match_prefix(&name) else {
            continue;
        };
        debug!(file = %name, file_type = %file_type, "located export file");
        files.version = extract_version(&name).or(files.version);
        files.located.insert(file_type, file_path);
    }
    Ok(files)
}

fn match_prefix(filename: &str) -> Option<FileType> {
    let upper = filename.to_ascii_uppercase();
    FileType::ORDERED
        .into_iter()
        .find(|file_type| upper.starts_with(file_type.prefix()))
}

/// Extracts the dotted version stamp from `PREFIX-1.37.2.xml`.
fn extract_version(filename: &str) -> Option<String> {
    let stem = filename.strip_suffix(".xml").unwrap_or(filename);
    let (_, version) = stem.split_once('-')?;
    if !version.is_empty()
        && version
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.')
    {
        Some(version.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn test_discovery_maps_prefixes_and_version() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "AMP-1.37.2.xml");
        touch(dir.path(), "REF-1.37.2.xml");
        touch(dir.path(), "RMB-1.37.2.xml");
        touch(dir.path(), "readme.txt");
        touch(dir.path(), "UNKNOWN-1.37.2.xml");

        let files = discover_sam_files(dir.path()).unwrap();
        assert_eq!(files.located.len(), 3);
        assert!(files.path(FileType::AmpHierarchy).is_some());
        assert_eq!(files.version.as_deref(), Some("1.37.2"));
        assert_eq!(
            files.missing_required(&[FileType::Reference, FileType::Companies]),
            vec![FileType::Companies]
        );
    }

    #[test]
    fn test_newest_export_wins_on_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "AMP-1.36.0.xml");
        touch(dir.path(), "AMP-1.37.2.xml");

        let files = discover_sam_files(dir.path()).unwrap();
        let path = files.path(FileType::AmpHierarchy).unwrap();
        assert!(path.to_string_lossy().ends_with("AMP-1.37.2.xml"));
    }

    #[test]
    fn test_missing_directory() {
        let err = discover_sam_files("/no/such/dir").unwrap_err();
        assert!(matches!(err, LoaderError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_extract_version() {
        assert_eq!(extract_version("AMP-1.37.2.xml"), Some("1.37.2".to_string()));
        assert_eq!(extract_version("AMP.xml"), None);
        assert_eq!(extract_version("AMP-beta.xml"), None);
    }
}
