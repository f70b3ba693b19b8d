//! Company (actor) master data.

use chrono::NaiveDate;

use crate::row::TableRow;
use crate::value::{push_opt, FieldValue};
use crate::{tables, LangMap};

/// A company, keyed by its zero-padded actor number.
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    /// Natural key, always five digits (`"00042"`).
    pub actor_nr: String,
    /// Multilingual denomination.
    pub name: LangMap,
    /// Legal form (NV, SA, ...).
    pub legal_form: Option<String>,
    /// ISO country code.
    pub country_code: Option<String>,
    /// VAT number.
    pub vat_nr: Option<String>,
    /// Start of the validity window.
    pub start_date: Option<NaiveDate>,
    /// End of the validity window (exclusive).
    pub end_date: Option<NaiveDate>,
}

impl Company {
    /// Zero-pads a raw actor number to the canonical five digits.
    pub fn pad_actor_nr(raw: &str) -> String {
        format!("{:0>5}", raw.trim())
    }
}

impl TableRow for Company {
    fn table(&self) -> &'static str {
        tables::COMPANY
    }

    fn key_columns(&self) -> &'static [&'static str] {
        &["actor_nr"]
    }

    fn columns(&self) -> Vec<(&'static str, FieldValue)> {
        let mut columns = vec![
            ("actor_nr", FieldValue::Text(self.actor_nr.clone())),
            ("name", FieldValue::Text(self.name.to_json())),
        ];
        push_opt(&mut columns, "legal_form", self.legal_form.clone());
        push_opt(&mut columns, "country_code", self.country_code.clone());
        push_opt(&mut columns, "vat_nr", self.vat_nr.clone());
        push_opt(&mut columns, "start_date", self.start_date);
        push_opt(&mut columns, "end_date", self.end_date);
        columns
    }

    fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_actor_nr() {
        assert_eq!(Company::pad_actor_nr("42"), "00042");
        assert_eq!(Company::pad_actor_nr(" 7 "), "00007");
        assert_eq!(Company::pad_actor_nr("12345"), "12345");
        assert_eq!(Company::pad_actor_nr("123456"), "123456");
    }
}
