//! Transformer for the legal document file.
//!
//! A `<LegalBasis>` element owns a recursive tree of references and
//! text blocks. Nodes carry no stable numeric ids, so each node is
//! keyed by the slash-joined path of its ancestors' keys.

use sam_types::{LegalBasis, LegalReference, LegalText, Record};

use crate::element::Element;
use crate::versioned::{current_version, parse_date};

use super::{attr_integer, opt_text, required_attr, Transformed};

/// Reference nesting deeper than this is treated as malformed input
/// and cut off.
const MAX_REFERENCE_DEPTH: usize = 5;

/// `<LegalBasis key="...">` with nested `<LegalReference>` and
/// `<LegalText>` trees.
pub fn transform_legal_basis(element: &Element) -> Transformed {
    let Some(key) = required_attr(element, "key") else {
        return Transformed::Skipped("missing key");
    };
    let Some(data) = current_version(element) else {
        return Transformed::Skipped("no current version");
    };
    let title = data.lang_map("Title");
    if title.is_empty() {
        return Transformed::Skipped("missing title");
    }

    let mut rows = vec![Record::LegalBasis(LegalBasis {
        key: key.clone(),
        title,
        basis_type: opt_text(data, "Type"),
        effective_on: opt_text(data, "EffectiveOn").and_then(|raw| parse_date(&raw)),
    })];
    for reference in element.children_named("LegalReference") {
        collect_reference(reference, &key, &key, None, 1, &mut rows);
    }
    Transformed::Rows(rows)
}

fn collect_reference(
    reference: &Element,
    basis_key: &str,
    parent_path: &str,
    parent: Option<&str>,
    depth: usize,
    rows: &mut Vec<Record>,
) {
    if depth > MAX_REFERENCE_DEPTH {
        return;
    }
    let Some(key) = required_attr(reference, "key") else {
        return;
    };
    let Some(data) = current_version(reference) else {
        return;
    };
    let path = format!("{parent_path}/{key}");
    rows.push(Record::LegalReference(LegalReference {
        path: path.clone(),
        legal_basis_key: basis_key.to_string(),
        parent_path: parent.map(str::to_string),
        title: data.lang_map("Title"),
    }));

    for child in reference.children_named("LegalReference") {
        collect_reference(child, basis_key, &path, Some(&path), depth + 1, rows);
    }
    for text in reference.children_named("LegalText") {
        collect_text(text, &path, &path, None, 1, rows);
    }
}

fn collect_text(
    text: &Element,
    reference_path: &str,
    parent_path: &str,
    parent: Option<&str>,
    depth: usize,
    rows: &mut Vec<Record>,
) {
    if depth > MAX_REFERENCE_DEPTH {
        return;
    }
    let Some(sequence_nr) = attr_integer(text, "sequenceNr") else {
        return;
    };
    let Some(data) = current_version(text) else {
        return;
    };
    let path = format!("{parent_path}/{sequence_nr}");
    rows.push(Record::LegalText(LegalText {
        path: path.clone(),
        legal_reference_path: reference_path.to_string(),
        parent_path: parent.map(str::to_string),
        sequence_nr,
        content: data.lang_map("Content"),
        text_type: opt_text(data, "Type"),
    }));

    for child in text.children_named("LegalText") {
        collect_text(child, reference_path, &path, Some(&path), depth + 1, rows);
    }
}
