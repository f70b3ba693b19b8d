//! Transformer for the company (actor) file.

use sam_types::{Company, Record};

use crate::element::Element;
use crate::versioned::{current_version, validity};

use super::{opt_text, required_attr, Transformed};

/// `<Company actorNr="...">` with versioned denomination data.
///
/// Actor numbers arrive unpadded and are normalized to five digits so
/// that references from the AMP file line up.
pub fn transform_company(element: &Element) -> Transformed {
    let Some(raw_actor_nr) = required_attr(element, "actorNr") else {
        return Transformed::Skipped("missing actorNr");
    };
    let Some(data) = current_version(element) else {
        return Transformed::Skipped("no current version");
    };
    let name = data.lang_map("Name");
    if name.is_empty() {
        return Transformed::Skipped("missing name");
    }
    let (start_date, end_date) = validity(data);
    Transformed::one(Record::Company(Company {
        actor_nr: Company::pad_actor_nr(&raw_actor_nr),
        name,
        legal_form: opt_text(data, "LegalForm"),
        country_code: opt_text(data, "CountryCode"),
        vat_nr: opt_text(data, "VatNr"),
        start_date,
        end_date,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::testutil::parse_one;
    use sam_types::TableRow;

    #[test]
    fn test_company_actor_nr_is_zero_padded() {
        let doc = r#"<r><ns2:Company actorNr="42">
            <ns2:Data from="1999-01-01">
                <Name xml:lang="nl">Janssen-Cilag</Name>
                <LegalForm>NV</LegalForm>
                <CountryCode>BE</CountryCode>
            </ns2:Data>
        </ns2:Company></r>"#;
        let element = parse_one(doc, "Company");

        let Transformed::Rows(rows) = transform_company(&element) else {
            panic!("expected rows");
        };
        let Record::Company(company) = &rows[0] else {
            panic!("expected company");
        };
        assert_eq!(company.actor_nr, "00042");
        assert_eq!(company.legal_form.as_deref(), Some("NV"));
        assert_eq!(company.vat_nr, None);
        assert_eq!(company.natural_key(), "00042");
    }

    #[test]
    fn test_company_without_actor_nr_is_skipped() {
        let doc = r#"<r><Company><Data><Name xml:lang="nl">x</Name></Data></Company></r>"#;
        let element = parse_one(doc, "Company");
        assert!(matches!(
            transform_company(&element),
            Transformed::Skipped("missing actorNr")
        ));
    }
}
