//! Entity transformers: one pure function per entity type, mapping a
//! parsed [`Element`](crate::element::Element) to zero, one or many
//! target rows.
//!
//! A transformer never fails: a source element that misses its natural
//! key or its resolved name is reported as [`Transformed::Skipped`]
//! with a reason, so callers can count drops without changing control
//! flow.

mod amp;
mod chapter_iv;
mod company;
mod legal;
mod product;
mod reference;
mod reimbursement;

pub use amp::transform_amp;
pub use chapter_iv::transform_chapter_iv_paragraph;
pub use company::transform_company;
pub use legal::transform_legal_basis;
pub use product::{transform_vmp, transform_vmp_group, transform_vtm};
pub use reference::{
    transform_atc, transform_pharmaceutical_form, transform_route_of_administration,
    transform_substance,
};
pub use reimbursement::transform_reimbursement_context;

use sam_types::Record;

use crate::element::Element;

/// Result of transforming one source element.
#[derive(Debug, Clone)]
pub enum Transformed {
    /// Rows to import; composite entities emit several record kinds.
    Rows(Vec<Record>),
    /// The element was dropped, with the reason.
    Skipped(&'static str),
}

impl Transformed {
    /// Wraps a single record.
    pub fn one(record: Record) -> Self {
        Transformed::Rows(vec![record])
    }

    /// Number of rows produced (zero when skipped).
    pub fn row_count(&self) -> usize {
        match self {
            Transformed::Rows(rows) => rows.len(),
            Transformed::Skipped(_) => 0,
        }
    }
}

/// A required attribute: present and non-empty after trimming.
pub(crate) fn required_attr(element: &Element, name: &str) -> Option<String> {
    element
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Trimmed, non-empty text of a child element.
pub(crate) fn opt_text(element: &Element, name: &str) -> Option<String> {
    element
        .child_text(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// The `code` attribute of a named child (`<Substance code="SUB1"/>`).
pub(crate) fn child_code(element: &Element, name: &str) -> Option<String> {
    element.child(name).and_then(|child| required_attr(child, "code"))
}

/// Decimal text of a child element.
pub(crate) fn opt_decimal(element: &Element, name: &str) -> Option<f64> {
    opt_text(element, name).and_then(|value| value.parse::<f64>().ok())
}

/// Boolean text of a child element (`true`/`false`, `1`/`0`).
pub(crate) fn opt_bool(element: &Element, name: &str) -> Option<bool> {
    match opt_text(element, name)?.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Integer value of an attribute.
pub(crate) fn attr_integer(element: &Element, name: &str) -> Option<i64> {
    element.attr(name)?.trim().parse::<i64>().ok()
}

#[cfg(test)]
pub(crate) mod testutil {
    //! Shared fixture helpers for transformer tests: parse a literal
    //! XML snippet into a single element.

    use crate::element::Element;
    use crate::stream::ElementStream;

    pub fn parse_one(document: &str, target: &str) -> Element {
        let mut stream = ElementStream::from_str(document, target);
        stream
            .next()
            .unwrap_or_else(|| panic!("fixture holds one <{target}>"))
    }
}
