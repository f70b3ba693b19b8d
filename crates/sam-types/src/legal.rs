//! Legal document hierarchy: basis → reference* → text*.
//!
//! The source publishes no stable numeric ids for this tree, so nodes
//! are identified by the slash-joined path of their ancestor keys.

use chrono::NaiveDate;

use crate::row::TableRow;
use crate::value::{push_opt, FieldValue};
use crate::{tables, LangMap};

/// A legal basis (a law or royal decree).
#[derive(Debug, Clone, PartialEq)]
pub struct LegalBasis {
    /// Natural key.
    pub key: String,
    /// Multilingual title.
    pub title: LangMap,
    /// Basis type.
    pub basis_type: Option<String>,
    /// Date the basis took effect.
    pub effective_on: Option<NaiveDate>,
}

impl TableRow for LegalBasis {
    fn table(&self) -> &'static str {
        tables::LEGAL_BASIS
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["key"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = vec![
            ("key", FieldValue::Text(self.key.clone())),
            ("title", FieldValue::Text(self.title.to_json())),
        ];
        push_opt(&mut columns, "basis_type", self.basis_type.clone());
        push_opt(&mut columns, "effective_on", self.effective_on);
        columns
    }

    fn retain_expired(&self) -> bool {
        true
    }
}

/// An article-level reference within a legal basis; recursive.
#[derive(Debug, Clone, PartialEq)]
pub struct LegalReference {
    /// Natural key: slash-joined path of ancestor keys
    /// (`"RD-2001-12-21/art-1/par-2"`).
    pub path: String,
    /// Root legal basis key.
    pub legal_basis_key: String,
    /// Parent reference path, absent for top-level references.
    pub parent_path: Option<String>,
    /// Multilingual title.
    pub title: LangMap,
}

impl TableRow for LegalReference {
    fn table(&self) -> &'static str {
        tables::LEGAL_REFERENCE
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["path"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = vec![
            ("path", FieldValue::Text(self.path.clone())),
            (
                "legal_basis_key",
                FieldValue::Text(self.legal_basis_key.clone()),
            ),
            ("title", FieldValue::Text(self.title.to_json())),
        ];
        push_opt(&mut columns, "parent_path", self.parent_path.clone());
        columns
    }

    fn retain_expired(&self) -> bool {
        true
    }
}

/// A text block under a legal reference; recursive, sequence-ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct LegalText {
    /// Natural key: owning path plus own sequence number
    /// (`"RD-2001-12-21/art-1/3"`).
    pub path: String,
    /// The legal reference this text (tree) hangs under.
    pub legal_reference_path: String,
    /// Parent text path, absent for texts directly under a reference.
    pub parent_path: Option<String>,
    /// Order among siblings.
    pub sequence_nr: i64,
    /// Multilingual content, markup stripped.
    pub content: LangMap,
    /// Text type.
    pub text_type: Option<String>,
}

impl TableRow for LegalText {
    fn table(&self) -> &'static str {
        tables::LEGAL_TEXT
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["path"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = vec![
            ("path", FieldValue::Text(self.path.clone())),
            (
                "legal_reference_path",
                FieldValue::Text(self.legal_reference_path.clone()),
            ),
            ("sequence_nr", FieldValue::Integer(self.sequence_nr)),
            ("content", FieldValue::Text(self.content.to_json())),
        ];
        push_opt(&mut columns, "parent_path", self.parent_path.clone());
        push_opt(&mut columns, "text_type", self.text_type.clone());
        columns
    }

    fn retain_expired(&self) -> bool {
        true
    }
}
