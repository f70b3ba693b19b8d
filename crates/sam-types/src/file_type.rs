//! Source file types of the formulary export.
//!
//! Each export version ships one XML document per logical file type,
//! distinguished by filename prefix (`AMP-1657883400724.xml`). Later
//! files reference identifiers populated by earlier ones, so the
//! processing order is fixed.

use serde::{Deserialize, Serialize};

use crate::tables;

/// A logical source file type within one export version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// Reference data: substances, ATC codes, forms, routes.
    Reference,
    /// Company / actor master data.
    Companies,
    /// Legal bases, references and texts.
    Legal,
    /// VTM / VMP group / VMP hierarchy.
    VmpHierarchy,
    /// AMP hierarchy: products, components, ingredients, packages.
    AmpHierarchy,
    /// Reimbursement contexts (references DMPPs from the AMP file).
    Reimbursement,
    /// Chapter IV paragraphs.
    ChapterIv,
}

impl FileType {
    /// All file types in mandatory processing order.
    ///
    /// Reimbursement must come after the AMP hierarchy because its
    /// records are validated against the DMPP keys seen there.
    pub const ORDERED: [FileType; 7] = [
        FileType::Reference,
        FileType::Companies,
        FileType::Legal,
        FileType::VmpHierarchy,
        FileType::AmpHierarchy,
        FileType::Reimbursement,
        FileType::ChapterIv,
    ];

    /// Filename prefix identifying this file type.
    pub fn prefix(&self) -> &'static str {
        match self {
            FileType::Reference => "REF",
            FileType::Companies => "CMP",
            FileType::Legal => "LGL",
            FileType::VmpHierarchy => "VMP",
            FileType::AmpHierarchy => "AMP",
            FileType::Reimbursement => "RMB",
            FileType::ChapterIv => "CIV",
        }
    }

    /// Target tables this file type populates.
    ///
    /// Used by the all-or-nothing gate: each of these tables must show
    /// at least one imported row before the run may finalize.
    pub fn expected_tables(&self) -> &'static [&'static str] {
        match self {
            FileType::Reference => &[
                tables::SUBSTANCE,
                tables::ATC_CLASSIFICATION,
                tables::PHARMACEUTICAL_FORM,
                tables::ROUTE_OF_ADMINISTRATION,
            ],
            FileType::Companies => &[tables::COMPANY],
            FileType::Legal => &[
                tables::LEGAL_BASIS,
                tables::LEGAL_REFERENCE,
                tables::LEGAL_TEXT,
            ],
            FileType::VmpHierarchy => &[tables::VTM, tables::VMP_GROUP, tables::VMP],
            FileType::AmpHierarchy => &[
                tables::AMP,
                tables::AMP_COMPONENT,
                tables::AMP_INGREDIENT,
                tables::AMPP,
                tables::DMPP,
            ],
            FileType::Reimbursement => &[tables::REIMBURSEMENT_CONTEXT],
            FileType::ChapterIv => &[tables::CHAPTER_IV_PARAGRAPH],
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_places_reimbursement_after_amp() {
        let amp = FileType::ORDERED
            .iter()
            .position(|f| *f == FileType::AmpHierarchy)
            .unwrap();
        let rmb = FileType::ORDERED
            .iter()
            .position(|f| *f == FileType::Reimbursement)
            .unwrap();
        assert!(amp < rmb);
    }

    #[test]
    fn test_prefixes_are_unique() {
        let mut prefixes: Vec<_> = FileType::ORDERED.iter().map(|f| f.prefix()).collect();
        prefixes.sort_unstable();
        prefixes.dedup();
        assert_eq!(prefixes.len(), FileType::ORDERED.len());
    }

    #[test]
    fn test_expected_tables_cover_all_tables() {
        let mut all: Vec<&str> = FileType::ORDERED
            .iter()
            .flat_map(|f| f.expected_tables().iter().copied())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), tables::ALL.len());
    }
}
