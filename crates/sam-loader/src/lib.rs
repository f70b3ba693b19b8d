//! # sam-loader
//!
//! Streaming parser and transformation pipeline for medication
//! formulary export files.
//!
//! The loader turns the seven multi-gigabyte XML export files into
//! typed target rows in four stages: [`ElementStream`] materializes
//! one top-level element at a time, [`versioned`] resolves the
//! current temporal version of each element, the [`transform`]
//! functions map resolved elements to [`sam_types::Record`] rows, and
//! [`collect_records`] drives the three stages over one file while
//! threading a [`SyncContext`] for cross-file validation.

#![warn(missing_docs)]

pub mod context;
pub mod discover;
pub mod element;
pub mod pipeline;
pub mod stream;
pub mod transform;
pub mod types;
pub mod versioned;

pub use context::SyncContext;
pub use discover::{discover_sam_files, SamFiles};
pub use element::Element;
pub use pipeline::{collect_records, FileRecords, ParseStats};
pub use stream::ElementStream;
pub use types::{LoaderError, LoaderResult};

// Re-export sam-types for convenience
pub use sam_types;
