//! Per-file parse pipeline: stream, resolve, transform, collect.
//!
//! A stream is forward only and extracts one tag name per pass, so a
//! file holding several entity kinds (the reference and virtual
//! hierarchy files) is streamed once per target tag.

use std::path::Path;

use sam_types::{FileType, Record};
use tracing::info;

use crate::context::SyncContext;
use crate::stream::ElementStream;
use crate::transform::{
    transform_amp, transform_atc, transform_chapter_iv_paragraph, transform_company,
    transform_legal_basis, transform_pharmaceutical_form, transform_reimbursement_context,
    transform_route_of_administration, transform_substance, transform_vmp, transform_vmp_group,
    transform_vtm, Transformed,
};
use crate::types::LoaderResult;

/// Counters accumulated while parsing one export file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseStats {
    /// Source elements materialized.
    pub elements: usize,
    /// Target rows produced.
    pub rows: usize,
    /// Elements dropped by a transformer.
    pub skipped: usize,
    /// Malformed fragments skipped by the XML reader.
    pub xml_errors: usize,
}

impl ParseStats {
    fn merge(&mut self, other: ParseStats) {
        self.elements += other.elements;
        self.rows += other.rows;
        self.skipped += other.skipped;
        self.xml_errors += other.xml_errors;
    }
}

/// The outcome of parsing one export file.
#[derive(Debug, Default)]
pub struct FileRecords {
    /// All rows produced from the file, in document order per pass.
    pub records: Vec<Record>,
    /// Parse counters.
    pub stats: ParseStats,
}

/// Parses one export file into target rows.
///
/// Transformer skips are counted on `ctx` under the entity's tag
/// name; parsing the AMP file additionally registers every DMPP key
/// on `ctx` for the reimbursement file's referential check.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is truncated at
/// the top level. Malformed individual elements are skipped and
/// counted, not raised.
pub fn collect_records(
    file_type: FileType,
    path: &Path,
    ctx: &mut SyncContext,
) -> LoaderResult<FileRecords> {
    let mut out = FileRecords::default();
    for target in targets(file_type) {
        let stats = run_pass(file_type, path, target, ctx, &mut out.records)?;
        out.stats.merge(stats);
    }
    info!(
        file_type = %file_type,
        elements = out.stats.elements,
        rows = out.stats.rows,
        skipped = out.stats.skipped,
        xml_errors = out.stats.xml_errors,
        "parsed export file"
    );
    Ok(out)
}

/// Target tag names per file, in parse order.
fn targets(file_type: FileType) -> &'static [&'static str] {
    match file_type {
        FileType::Reference => &[
            "Substance",
            "Atc",
            "PharmaceuticalForm",
            "RouteOfAdministration",
        ],
        FileType::Companies => &["Company"],
        FileType::Legal => &["LegalBasis"],
        FileType::VmpHierarchy => &["Vtm", "VmpGroup", "Vmp"],
        FileType::AmpHierarchy => &["Amp"],
        FileType::Reimbursement => &["ReimbursementContext"],
        FileType::ChapterIv => &["Paragraph"],
    }
}

fn run_pass(
    file_type: FileType,
    path: &Path,
    target: &str,
    ctx: &mut SyncContext,
    records: &mut Vec<Record>,
) -> LoaderResult<ParseStats> {
    let mut stream = ElementStream::from_path(path, target)?;
    let mut stats = ParseStats::default();
    for element in stream.by_ref() {
        stats.elements += 1;
        let transformed = match (file_type, target) {
            (FileType::AmpHierarchy, _) => transform_amp(&element, ctx),
            (FileType::Reimbursement, _) => transform_reimbursement_context(&element, ctx),
            (_, "Substance") => transform_substance(&element),
            (_, "Atc") => transform_atc(&element),
            (_, "PharmaceuticalForm") => transform_pharmaceutical_form(&element),
            (_, "RouteOfAdministration") => transform_route_of_administration(&element),
            (_, "Company") => transform_company(&element),
            (_, "LegalBasis") => transform_legal_basis(&element),
            (_, "Vtm") => transform_vtm(&element),
            (_, "VmpGroup") => transform_vmp_group(&element),
            (_, "Vmp") => transform_vmp(&element),
            (_, "Paragraph") => transform_chapter_iv_paragraph(&element),
            _ => unreachable!("target tags come from targets()"),
        };
        match transformed {
            Transformed::Rows(rows) => {
                stats.rows += rows.len();
                records.extend(rows);
            }
            Transformed::Skipped(reason) => {
                stats.skipped += 1;
                ctx.record_drop(target, reason);
            }
        }
    }
    stats.xml_errors = stream.errors();
    Ok(stats)
}
