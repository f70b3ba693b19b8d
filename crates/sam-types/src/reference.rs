//! Reference / master data entities.
//!
//! All four come from the REF file and are keyed by a stable code.

use chrono::NaiveDate;

use crate::row::TableRow;
use crate::value::{push_opt, FieldValue};
use crate::{tables, LangMap};

/// An active substance.
#[derive(Debug, Clone, PartialEq)]
pub struct Substance {
    /// Natural key.
    pub code: String,
    /// Multilingual name.
    pub name: LangMap,
    /// Start of the validity window.
    pub start_date: Option<NaiveDate>,
    /// End of the validity window (exclusive).
    pub end_date: Option<NaiveDate>,
}

impl TableRow for Substance {
    fn table(&self) -> &'static str {
        tables::SUBSTANCE
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

/// An ATC classification code.
#[derive(Debug, Clone, PartialEq)]
pub struct AtcClassification {
    /// Natural key (the ATC code itself).
    pub code: String,
    /// English description.
    pub description: String,
}

impl TableRow for AtcClassification {
    fn table(&self) -> &'static str {
        tables::ATC_CLASSIFICATION
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["code"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("code", FieldValue::Text(self.code.clone())),
            ("description", FieldValue::Text(self.description.clone())),
        ]
    }
}

/// A pharmaceutical form (tablet, syrup, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct PharmaceuticalForm {
    /// Natural key.
    pub code: String,
    /// Multilingual name.
    pub name: LangMap,
    /// Start of the validity window.
    pub start_date: Option<NaiveDate>,
    /// End of the validity window (exclusive).
    pub end_date: Option<NaiveDate>,
}

impl TableRow for PharmaceuticalForm {
    fn table(&self) -> &'static str {
        tables::PHARMACEUTICAL_FORM
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

/// A route of administration.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOfAdministration {
    /// Natural key.
    pub code: String,
    /// Multilingual name.
    pub name: LangMap,
    /// Start of the validity window.
    pub start_date: Option<NaiveDate>,
    /// End of the validity window (exclusive).
    pub end_date: Option<NaiveDate>,
}

impl TableRow for RouteOfAdministration {
    fn table(&self) -> &'static str {
        tables::ROUTE_OF_ADMINISTRATION
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
