//! # sam-types
//!
//! Type definitions for the SAM medication formulary export.
//!
//! This crate provides the entity types produced by the sync engine's
//! transformers — the master data, the VTM/VMP/AMP product hierarchy,
//! packages, reimbursement rules and the legal document tree — plus
//! the [`TableRow`] mapping that ties each record to its target table
//! and natural key.
//!
//! ## Usage
//!
//! ```rust
//! use sam_types::{Dmpp, Record, TableRow};
//!
//! let dmpp = Dmpp {
//!     code: "0039347".to_string(),
//!     delivery_environment: "P".to_string(),
//!     ampp_cti_extended: Some("CTI001".to_string()),
//!     price: Some(7.53),
//!     reimbursable: Some(true),
//!     start_date: None,
//!     end_date: None,
//! };
//!
//! let record = Record::Dmpp(dmpp);
//! assert_eq!(record.table(), sam_types::tables::DMPP);
//! assert_eq!(record.row().natural_key(), "0039347:P");
//! ```

#![warn(missing_docs)]

mod amp;
mod company;
mod file_type;
mod lang;
mod legal;
mod product;
mod reference;
mod reimbursement;
mod row;
pub mod tables;
mod value;

pub use amp::{Amp, AmpComponent, AmpIngredient, Ampp, Dmpp};
pub use company::Company;
pub use file_type::FileType;
pub use lang::LangMap;
pub use legal::{LegalBasis, LegalReference, LegalText};
pub use product::{Vmp, VmpGroup, Vtm};
pub use reference::{AtcClassification, PharmaceuticalForm, RouteOfAdministration, Substance};
pub use reimbursement::{ChapterIvParagraph, ReimbursementContext};
pub use row::{Record, TableRow};
pub use value::{push_opt, FieldValue};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        let _file: FileType = FileType::Reference;
        let _value: FieldValue = FieldValue::Integer(1);
        let _map = LangMap::new();
    }

    #[test]
    fn test_all_tables_listed() {
        assert_eq!(tables::ALL.len(), 18);
    }
}
