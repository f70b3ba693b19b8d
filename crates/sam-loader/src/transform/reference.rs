//! Transformers for the REF file: substances, ATC codes, forms and
//! routes of administration.

use sam_types::{
    AtcClassification, PharmaceuticalForm, Record, RouteOfAdministration, Substance,
};

use crate::element::Element;
use crate::versioned::{current_version, validity};

use super::{opt_text, required_attr, Transformed};

/// `<Substance code="...">` with versioned name data.
pub fn transform_substance(element: &Element) -> Transformed {
    let Some(code) = required_attr(element, "code") else {
        return Transformed::Skipped("missing code");
    };
    let Some(data) = current_version(element) else {
        return Transformed::Skipped("no current version");
    };
    let name = data.lang_map("Name");
    if name.is_empty() {
        return Transformed::Skipped("missing name");
    }
    let (start_date, end_date) = validity(data);
    Transformed::one(Record::Substance(Substance {
        code,
        name,
        start_date,
        end_date,
    }))
}

/// `<Atc code="...">` with a single-language description.
pub fn transform_atc(element: &Element) -> Transformed {
    let Some(code) = required_attr(element, "code") else {
        return Transformed::Skipped("missing code");
    };
    let Some(data) = current_version(element) else {
        return Transformed::Skipped("no current version");
    };
    let Some(description) = opt_text(data, "Description") else {
        return Transformed::Skipped("missing description");
    };
    Transformed::one(Record::AtcClassification(AtcClassification {
        code,
        description,
    }))
}

/// `<PharmaceuticalForm code="...">` with versioned name data.
pub fn transform_pharmaceutical_form(element: &Element) -> Transformed {
    let Some(code) = required_attr(element, "code") else {
        return Transformed::Skipped("missing code");
    };
    let Some(data) = current_version(element) else {
        return Transformed::Skipped("no current version");
    };
    let name = data.lang_map("Name");
    if name.is_empty() {
        return Transformed::Skipped("missing name");
    }
    let (start_date, end_date) = validity(data);
    Transformed::one(Record::PharmaceuticalForm(PharmaceuticalForm {
        code,
        name,
        start_date,
        end_date,
    }))
}

/// `<RouteOfAdministration code="...">` with versioned name data.
pub fn transform_route_of_administration(element: &Element) -> Transformed {
    let Some(code) = required_attr(element, "code") else {
        return Transformed::Skipped("missing code");
    };
    let Some(data) = current_version(element) else {
        return Transformed::Skipped("no current version");
    };
    let name = data.lang_map("Name");
    if name.is_empty() {
        return Transformed::Skipped("missing name");
    }
    let (start_date, end_date) = validity(data);
    Transformed::one(Record::RouteOfAdministration(RouteOfAdministration {
        code,
        name,
        start_date,
        end_date,
    }))
}
