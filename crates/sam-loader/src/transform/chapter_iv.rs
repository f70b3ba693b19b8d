//! Transformer for the chapter IV paragraph file.

use sam_types::{ChapterIvParagraph, Record};

use crate::element::Element;
use crate::versioned::{current_version, validity};

use super::{opt_text, required_attr, Transformed};

/// `<Paragraph chapterName="..." paragraphName="...">`.
///
/// Paragraphs survive expiry filtering downstream: closed paragraphs
/// stay queryable for historical prior-approval agreements.
pub fn transform_chapter_iv_paragraph(element: &Element) -> Transformed {
    let (Some(chapter_name), Some(paragraph_name)) = (
        required_attr(element, "chapterName"),
        required_attr(element, "paragraphName"),
    ) else {
        return Transformed::Skipped("missing key");
    };
    let Some(data) = current_version(element) else {
        return Transformed::Skipped("no current version");
    };
    let (start_date, end_date) = validity(data);
    Transformed::one(Record::ChapterIvParagraph(ChapterIvParagraph {
        chapter_name,
        paragraph_name,
        key_string_nl: opt_text(data, "KeyStringNl"),
        key_string_fr: opt_text(data, "KeyStringFr"),
        process_type: opt_text(data, "ProcessType"),
        publication_status: opt_text(data, "PublicationStatus"),
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
    fn test_paragraph_keeps_both_key_strings() {
        let doc = r#"<r><ns6:Paragraph chapterName="IV" paragraphName="1230000">
            <ns6:Data from="2015-01-01" to="2020-01-01">
                <KeyStringNl>gliptinen</KeyStringNl>
                <KeyStringFr>gliptines</KeyStringFr>
                <ProcessType>P1</ProcessType>
            </ns6:Data>
        </ns6:Paragraph></r>"#;
        let element = parse_one(doc, "Paragraph");

        let Transformed::Rows(rows) = transform_chapter_iv_paragraph(&element) else {
            panic!("expected rows");
        };
        let Record::ChapterIvParagraph(p) = &rows[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(p.key_string_nl.as_deref(), Some("gliptinen"));
        assert_eq!(p.key_string_fr.as_deref(), Some("gliptines"));
        assert_eq!(p.natural_key(), "IV:1230000");
        // Expired, but the row type opts out of expiry filtering.
        assert!(p.retain_expired());
    }

    #[test]
    fn test_paragraph_missing_half_of_key_is_skipped() {
        let doc = r#"<r><Paragraph chapterName="IV">
            <Data from="2015-01-01"/>
        </Paragraph></r>"#;
        let element = parse_one(doc, "Paragraph");
        assert!(matches!(
            transform_chapter_iv_paragraph(&element),
            Transformed::Skipped("missing key")
        ));
    }
}
