//! Column values produced by transformed records.
//!
//! The batch importer is storage-agnostic at this level: a record maps
//! to `(column, FieldValue)` pairs and the store adapter binds them as
//! SQL parameters.

use chrono::NaiveDate;

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text column.
    Text(String),
    /// Integer column.
    Integer(i64),
    /// Floating-point column.
    Real(f64),
    /// Boolean column (stored as 0/1).
    Bool(bool),
    /// Date column (stored as ISO-8601 text).
    Date(NaiveDate),
}

impl FieldValue {
    /// Canonical string form, used when composing natural-key strings
    /// for in-batch deduplication.
    pub fn key_fragment(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Real(r) => r.to_string(),
            FieldValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Real(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

/// Pushes `(column, value)` when the optional value is present.
///
/// Optional source fields are omitted from the column set entirely
/// rather than bound as NULL; the importer groups rows by identical
/// column sets before batching.
pub fn push_opt<T: Into<FieldValue>>(
    columns: &mut Vec<(&'static str, FieldValue)>,
    column: &'static str,
    value: Option<T>,
) {
    if let Some(value) = value {
        columns.push((column, value.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_fragments() {
        assert_eq!(FieldValue::Text("0039347".into()).key_fragment(), "0039347");
        assert_eq!(FieldValue::Integer(7).key_fragment(), "7");
        assert_eq!(FieldValue::Bool(true).key_fragment(), "1");
        let d = NaiveDate::from_ymd_opt(2022, 6, 30).unwrap();
        assert_eq!(FieldValue::Date(d).key_fragment(), "2022-06-30");
    }

    #[test]
    fn test_push_opt_skips_absent() {
        let mut cols: Vec<(&'static str, FieldValue)> = Vec::new();
        push_opt(&mut cols, "price", None::<f64>);
        push_opt(&mut cols, "status", Some("AUTHORIZED"));
        assert_eq!(cols.len(), 1);
        assert_eq!(cols[0].0, "status");
    }
}
