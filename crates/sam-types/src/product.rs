//! Virtual product hierarchy: VTM → VMP group → VMP.

use chrono::NaiveDate;

use crate::row::TableRow;
use crate::value::{push_opt, FieldValue};
use crate::{tables, LangMap};

/// A virtual therapeutic moiety.
#[derive(Debug, Clone, PartialEq)]
pub struct Vtm {
    /// Natural key.
    pub code: String,
    /// Multilingual name.
    pub name: LangMap,
    /// Start of the validity window.
    pub start_date: Option<NaiveDate>,
    /// End of the validity window (exclusive).
    pub end_date: Option<NaiveDate>,
}

impl TableRow for Vtm {
    fn table(&self) -> &'static str {
        tables::VTM
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["code"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = vec![
            ("code", FieldValue::Text(self.code.clone())),
            ("name", FieldValue::Text(self.name.to_json())),
        ];
        push_opt(&mut columns, "start_date", self.start_date);
        push_opt(&mut columns, "end_date", self.end_date);
        columns
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

/// A VMP group.
#[derive(Debug, Clone, PartialEq)]
pub struct VmpGroup {
    /// Natural key.
    pub code: String,
    /// Multilingual name.
    pub name: LangMap,
    /// Start of the validity window.
    pub start_date: Option<NaiveDate>,
    /// End of the validity window (exclusive).
    pub end_date: Option<NaiveDate>,
}

impl TableRow for VmpGroup {
    fn table(&self) -> &'static str {
        tables::VMP_GROUP
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["code"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = vec![
            ("code", FieldValue::Text(self.code.clone())),
            ("name", FieldValue::Text(self.name.to_json())),
        ];
        push_opt(&mut columns, "start_date", self.start_date);
        push_opt(&mut columns, "end_date", self.end_date);
        columns
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

/// A virtual (generic) medicinal product.
///
/// The VTM and VMP group references are codes only; their existence is
/// not enforced at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct Vmp {
    /// Natural key.
    pub code: String,
    /// Multilingual name.
    pub name: LangMap,
    /// Abbreviated name, if published.
    pub abbreviation: Option<String>,
    /// Referenced VTM code.
    pub vtm_code: Option<String>,
    /// Referenced VMP group code.
    pub vmp_group_code: Option<String>,
    /// Start of the validity window.
    pub start_date: Option<NaiveDate>,
    /// End of the validity window (exclusive).
    pub end_date: Option<NaiveDate>,
}

impl TableRow for Vmp {
    fn table(&self) -> &'static str {
        tables::VMP
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["code"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = vec![
            ("code", FieldValue::Text(self.code.clone())),
            ("name", FieldValue::Text(self.name.to_json())),
        ];
        push_opt(&mut columns, "abbreviation", self.abbreviation.clone());
        push_opt(&mut columns, "vtm_code", self.vtm_code.clone());
        push_opt(&mut columns, "vmp_group_code", self.vmp_group_code.clone());
        push_opt(&mut columns, "start_date", self.start_date);
        push_opt(&mut columns, "end_date", self.end_date);
        columns
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}
