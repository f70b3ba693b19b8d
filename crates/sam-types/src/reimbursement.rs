//! Reimbursement entities: contexts and chapter IV paragraphs.

use chrono::NaiveDate;

use crate::row::TableRow;
use crate::tables;
use crate::value::{push_opt, FieldValue};

/// A denormalized reimbursement rule for one purchasable unit under
/// one legal reference.
///
/// Valid only if the `(dmpp_code, delivery_environment)` pair was seen
/// among the DMPPs parsed earlier in the same run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReimbursementContext {
    /// Referenced DMPP code; part of the natural key.
    pub dmpp_code: String,
    /// Referenced delivery environment; part of the natural key.
    pub delivery_environment: String,
    /// Slash-joined legal reference path; completes the natural key.
    pub legal_reference_path: String,
    /// Reimbursement criterion category (A, B, Cx, ...).
    pub criterion_category: Option<String>,
    /// Reimbursement rate in percent.
    pub reimbursement_rate: Option<f64>,
    /// Reference base price.
    pub reference_base_price: Option<f64>,
    /// Whether the flat-rate system applies.
    pub flat_rate_system: Option<bool>,
    /// Start of the validity window.
    pub start_date: Option<NaiveDate>,
    /// End of the validity window (exclusive).
    pub end_date: Option<NaiveDate>,
}

impl TableRow for ReimbursementContext {
    fn table(&self) -> &'static str {
        tables::REIMBURSEMENT_CONTEXT
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["dmpp_code", "delivery_environment", "legal_reference_path"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = vec![
            ("dmpp_code", FieldValue::Text(self.dmpp_code.clone())),
            (
                "delivery_environment",
                FieldValue::Text(self.delivery_environment.clone()),
            ),
            (
                "legal_reference_path",
                FieldValue::Text(self.legal_reference_path.clone()),
            ),
        ];
        push_opt(
            &mut columns,
            "criterion_category",
            self.criterion_category.clone(),
        );
        push_opt(&mut columns, "reimbursement_rate", self.reimbursement_rate);
        push_opt(&mut columns, "reference_base_price", self.reference_base_price);
        push_opt(&mut columns, "flat_rate_system", self.flat_rate_system);
        push_opt(&mut columns, "start_date", self.start_date);
        push_opt(&mut columns, "end_date", self.end_date);
        columns
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

/// A chapter IV paragraph (prior-approval reimbursement conditions).
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterIvParagraph {
    /// Chapter name; part of the natural key.
    pub chapter_name: String,
    /// Paragraph name; completes the natural key.
    pub paragraph_name: String,
    /// Dutch key string.
    pub key_string_nl: Option<String>,
    /// French key string.
    pub key_string_fr: Option<String>,
    /// Agreement process type.
    pub process_type: Option<String>,
    /// Publication status.
    pub publication_status: Option<String>,
    /// Start of the validity window.
    pub start_date: Option<NaiveDate>,
    /// End of the validity window (exclusive).
    pub end_date: Option<NaiveDate>,
}

impl TableRow for ChapterIvParagraph {
    fn table(&self) -> &'static str {
        tables::CHAPTER_IV_PARAGRAPH
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["chapter_name", "paragraph_name"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = vec![
            ("chapter_name", FieldValue::Text(self.chapter_name.clone())),
            (
                "paragraph_name",
                FieldValue::Text(self.paragraph_name.clone()),
            ),
        ];
        push_opt(&mut columns, "key_string_nl", self.key_string_nl.clone());
        push_opt(&mut columns, "key_string_fr", self.key_string_fr.clone());
        push_opt(&mut columns, "process_type", self.process_type.clone());
        push_opt(
            &mut columns,
            "publication_status",
            self.publication_status.clone(),
        );
        push_opt(&mut columns, "start_date", self.start_date);
        push_opt(&mut columns, "end_date", self.end_date);
        columns
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    fn retain_expired(&self) -> bool {
        true
    }
}
