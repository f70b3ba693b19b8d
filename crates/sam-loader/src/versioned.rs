//! Temporal version resolution.
//!
//! Most source elements wrap their true field values in one or more
//! dated `Data` children carrying optional `from`/`to` attributes.
//! Exactly one version is "current" and supplies both the entity
//! fields and its validity window.

use chrono::NaiveDate;

use crate::element::Element;

/// Selects the current temporal version among an element's `Data`
/// children.
///
/// Rule: prefer a version without a `to` attribute (open ended); if
/// every version is closed, take the one with the lexicographically
/// greatest `to` date — chronologically greatest, given ISO dates.
pub fn current_version(element: &Element) -> Option<&Element> {
    let versions: Vec<&Element> = element.children_named("Data").collect();
    if let Some(open) = versions.iter().find(|v| v.attr("to").is_none()) {
        return Some(open);
    }
    versions
        .into_iter()
        .max_by(|a, b| a.attr("to").unwrap_or("").cmp(b.attr("to").unwrap_or("")))
}

/// Parses an ISO `YYYY-MM-DD` date, tolerating surrounding whitespace.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    raw.trim().parse::<NaiveDate>().ok()
}

/// The validity window of a resolved version, from its `from`/`to`
/// attributes.
pub fn validity(version: &Element) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let start = version.attr("from").and_then(parse_date);
    let end = version.attr("to").and_then(parse_date);
    (start, end)
}
