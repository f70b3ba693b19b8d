//! Transformers for the virtual product hierarchy file
//! (VTM, VMP group, VMP).

use sam_types::{Record, Vmp, VmpGroup, Vtm};

use crate::element::Element;
use crate::versioned::{current_version, validity};

use super::{child_code, opt_text, required_attr, Transformed};

/// `<Vtm code="...">` with a versioned multilingual name.
pub fn transform_vtm(element: &Element) -> Transformed {
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
    Transformed::one(Record::Vtm(Vtm {
        code,
        name,
        start_date,
        end_date,
    }))
}

/// `<VmpGroup code="...">`.
pub fn transform_vmp_group(element: &Element) -> Transformed {
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
    Transformed::one(Record::VmpGroup(VmpGroup {
        code,
        name,
        start_date,
        end_date,
    }))
}

/// `<Vmp code="...">` referencing its VTM and VMP group by code.
pub fn transform_vmp(element: &Element) -> Transformed {
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
    Transformed::one(Record::Vmp(Vmp {
        code,
        name,
        abbreviation: opt_text(data, "Abbreviation"),
        vtm_code: child_code(data, "Vtm"),
        vmp_group_code: child_code(data, "VmpGroup"),
        start_date,
        end_date,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::testutil::parse_one;

    #[test]
    fn test_vmp_resolves_references_from_current_version() {
        let doc = r#"<r><ns4:Vmp code="12345">
            <ns4:Data from="2019-01-01" to="2020-01-01">
                <Name xml:lang="nl">oud</Name>
                <Vtm code="OLD"/>
            </ns4:Data>
            <ns4:Data from="2020-01-01">
                <Name xml:lang="nl">paracetamol 500 mg oraal</Name>
                <Abbreviation>parac. 500</Abbreviation>
                <Vtm code="VTM9"/>
                <VmpGroup code="GRP4"/>
            </ns4:Data>
        </ns4:Vmp></r>"#;
        let element = parse_one(doc, "Vmp");

        let Transformed::Rows(rows) = transform_vmp(&element) else {
            panic!("expected rows");
        };
        let Record::Vmp(vmp) = &rows[0] else {
            panic!("expected vmp");
        };
        assert_eq!(vmp.vtm_code.as_deref(), Some("VTM9"));
        assert_eq!(vmp.vmp_group_code.as_deref(), Some("GRP4"));
        assert_eq!(vmp.abbreviation.as_deref(), Some("parac. 500"));
        assert_eq!(vmp.end_date, None);
    }

    #[test]
    fn test_vtm_without_name_is_skipped() {
        let doc = r#"<r><Vtm code="VTM1"><Data from="2020-01-01"/></Vtm></r>"#;
        let element = parse_one(doc, "Vtm");
        assert!(matches!(
            transform_vtm(&element),
            Transformed::Skipped("missing name")
        ));
    }
}
