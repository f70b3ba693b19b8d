//! Mapping from transformed records to target-table rows.

use chrono::NaiveDate;

use crate::amp::{Amp, AmpComponent, AmpIngredient, Ampp, Dmpp};
use crate::company::Company;
use crate::legal::{LegalBasis, LegalReference, LegalText};
use crate::product::{Vmp, VmpGroup, Vtm};
use crate::reference::{
    AtcClassification, PharmaceuticalForm, RouteOfAdministration, Substance,
};
use crate::reimbursement::{ChapterIvParagraph, ReimbursementContext};
use crate::value::FieldValue;

/// A record that knows its target table, natural key and column values.
///
/// `columns()` includes the key columns and only those optional columns
/// that are actually present on the record; the importer groups rows by
/// identical column sets before batching.
pub trait TableRow {
    /// Target table name.
    fn table(&self) -> &'static str;

    /// Natural-key columns, the upsert conflict target.
    fn key_columns(&self) -> &'static [&'static str];

    /// Column values, key columns first.
    fn columns(&self) -> Vec<(&'static str, FieldValue)>;

    /// End of the validity window, if the record carries one.
    fn end_date(&self) -> Option<NaiveDate> {
        None
    }

    /// Whether already-expired rows are still worth storing.
    ///
    /// Legal texts and chapter IV paragraphs keep their history; for
    /// everything else expired rows are filtered before the write.
    fn retain_expired(&self) -> bool {
        false
    }

    /// Natural-key string, used for in-batch deduplication.
    fn natural_key(&self) -> String {
        let columns = self.columns();
        self.key_columns()
            .iter()
            .map(|key| {
                columns
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| value.key_fragment())
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>()
            .join(":")
    }
}

/// Sum type over every record kind a transformer can emit.
#[derive(Debug, Clone)]
pub enum Record {
    /// Substance reference row.
    Substance(Substance),
    /// ATC classification row.
    AtcClassification(AtcClassification),
    /// Pharmaceutical form row.
    PharmaceuticalForm(PharmaceuticalForm),
    /// Route of administration row.
    RouteOfAdministration(RouteOfAdministration),
    /// Company row.
    Company(Company),
    /// VTM row.
    Vtm(Vtm),
    /// VMP group row.
    VmpGroup(VmpGroup),
    /// VMP row.
    Vmp(Vmp),
    /// AMP row.
    Amp(Amp),
    /// AMP component row.
    AmpComponent(AmpComponent),
    /// AMP ingredient row.
    AmpIngredient(AmpIngredient),
    /// AMPP row.
    Ampp(Ampp),
    /// DMPP row.
    Dmpp(Dmpp),
    /// Reimbursement context row.
    ReimbursementContext(ReimbursementContext),
    /// Chapter IV paragraph row.
    ChapterIvParagraph(ChapterIvParagraph),
    /// Legal basis row.
    LegalBasis(LegalBasis),
    /// Legal reference row.
    LegalReference(LegalReference),
    /// Legal text row.
    LegalText(LegalText),
}

impl Record {
    /// The record viewed as a table row.
    pub fn row(&self) -> &dyn TableRow {
        match self {
            Record::Substance(r) => r,
            Record::AtcClassification(r) => r,
            Record::PharmaceuticalForm(r) => r,
            Record::RouteOfAdministration(r) => r,
            Record::Company(r) => r,
            Record::Vtm(r) => r,
            Record::VmpGroup(r) => r,
            Record::Vmp(r) => r,
            Record::Amp(r) => r,
            Record::AmpComponent(r) => r,
            Record::AmpIngredient(r) => r,
            Record::Ampp(r) => r,
            Record::Dmpp(r) => r,
            Record::ReimbursementContext(r) => r,
            Record::ChapterIvParagraph(r) => r,
            Record::LegalBasis(r) => r,
            Record::LegalReference(r) => r,
            Record::LegalText(r) => r,
        }
    }

    /// Target table name, shorthand for `row().table()`.
    pub fn table(&self) -> &'static str {
        self.row().table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LangMap;

    #[test]
    fn test_natural_key_joins_key_columns() {
        let dmpp = Dmpp {
            code: "0039347".into(),
            delivery_environment: "P".into(),
            ampp_cti_extended: None,
            price: None,
            reimbursable: None,
            start_date: None,
            end_date: None,
        };
        assert_eq!(dmpp.natural_key(), "0039347:P");
    }

    #[test]
    fn test_record_delegates_table() {
        let mut name = LangMap::new();
        name.insert("nl", "stof");
        let record = Record::Substance(Substance {
            code: "SUB1".into(),
            name,
            start_date: None,
            end_date: None,
        });
        assert_eq!(record.table(), crate::tables::SUBSTANCE);
        assert_eq!(record.row().natural_key(), "SUB1");
    }
}
