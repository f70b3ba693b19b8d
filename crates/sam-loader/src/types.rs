//! Loader-specific error and result types.

use thiserror::Error;

/// Errors that can occur while reading export files.
///
/// Malformed individual elements are NOT errors at this level; they
/// are skipped by the stream and only counted.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// I/O error reading an export file.
    #[error("IO error reading export file: {0}")]
    Io(#[from] std::io::Error),

    /// XML reader error outside any element of interest.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Directory not found.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The path that was not found.
        path: String,
    },

    /// The file ended inside an element being buffered.
    #[error("Unexpected end of file inside element <{element}>")]
    TruncatedElement {
        /// Local name of the unterminated element.
        element: String,
    },

    /// An end tag did not close the element that was open.
    #[error("End tag </{found}> does not close open element <{expected}>")]
    MismatchedEndTag {
        /// Local name of the element that was open.
        expected: String,
        /// Local name the end tag carried.
        found: String,
    },
}

/// Result type for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;
