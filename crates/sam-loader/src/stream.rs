//! Streaming extraction of top-level export elements.
//!
//! Export files are multi-gigabyte XML documents holding thousands of
//! repeating elements of one tag name. [`ElementStream`] walks the
//! SAX-style event stream and materializes one [`Element`] tree at a
//! time, so memory use is bounded by the largest single element rather
//! than the file size.
//!
//! Namespace prefixes are ignored: the stream matches the local part
//! of the tag name, so `<ns2:Amp>` and `<Amp>` are the same target.
//!
//! Malformed fragments are skipped, counted and logged; the stream
//! keeps yielding the valid elements that follow. A stream is forward
//! only — reprocessing a file takes a fresh stream.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::warn;

use crate::element::{clean_text, local_part, Element};
use crate::types::{LoaderError, LoaderResult};

/// Abandon the stream after this many back-to-back reader errors, to
/// rule out spinning on input the reader cannot advance past.
const MAX_CONSECUTIVE_ERRORS: usize = 256;

/// A lazy, finite, forward-only sequence of top-level elements with a
/// given local tag name.
pub struct ElementStream<R: BufRead> {
    reader: Reader<R>,
    target: String,
    yielded: usize,
    errors: usize,
    finished: bool,
}

impl ElementStream<BufReader<File>> {
    /// Opens a stream over a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn from_path<P: AsRef<Path>>(path: P, target: &str) -> LoaderResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoaderError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file), target))
    }
}

impl<'a> ElementStream<&'a [u8]> {
    /// Opens a stream over an in-memory document. Mostly for tests.
    pub fn from_str(document: &'a str, target: &str) -> Self {
        Self::from_reader(document.as_bytes(), target)
    }
}

impl<R: BufRead> ElementStream<R> {
    /// Wraps an arbitrary buffered reader.
    pub fn from_reader(reader: R, target: &str) -> Self {
        let mut reader = Reader::from_reader(reader);
        // End-tag names are validated in `read_subtree` instead: the
        // reader's own check leaves it in a sticky error state on the
        // first mismatch, which would truncate the rest of the stream.
        reader.check_end_names(false);
        ElementStream {
            reader,
            target: local_part(target).to_string(),
            yielded: 0,
            errors: 0,
            finished: false,
        }
    }

    /// Number of elements yielded so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Number of malformed fragments or reader errors skipped so far.
    pub fn errors(&self) -> usize {
        self.errors
    }
}

impl<R: BufRead> Iterator for ElementStream<R> {
    type Item = Element;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let mut buf = Vec::new();
        let mut consecutive_errors = 0;
        loop {
            buf.clear();
            match self.reader.read_event_into(&mut buf) {
                Ok(Event::Eof) => {
                    self.finished = true;
                    return None;
                }
                Ok(Event::Start(start)) => {
                    consecutive_errors = 0;
                    let root = element_from_start(&start);
                    if root.local_name != self.target {
                        continue;
                    }
                    match read_subtree(&mut self.reader, root) {
                        Ok(element) => {
                            self.yielded += 1;
                            return Some(element);
                        }
                        Err(e) => {
                            self.errors += 1;
                            warn!(target_tag = %self.target, error = %e, "skipping malformed element");
                        }
                    }
                }
                Ok(Event::Empty(start)) => {
                    consecutive_errors = 0;
                    let element = element_from_start(&start);
                    if element.local_name == self.target {
                        // Self-closing target: complete without buffering.
                        self.yielded += 1;
                        return Some(element);
                    }
                }
                Ok(_) => {
                    consecutive_errors = 0;
                }
                Err(e) => {
                    self.errors += 1;
                    consecutive_errors += 1;
                    warn!(target_tag = %self.target, error = %e, "skipping unreadable XML event");
                    if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                        warn!(
                            target_tag = %self.target,
                            "reader cannot advance, abandoning stream"
                        );
                        self.finished = true;
                        return None;
                    }
                }
            }
        }
    }
}

/// Builds an [`Element`] from a start tag's name and attributes.
fn element_from_start(start: &BytesStart<'_>) -> Element {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(&name);
    for attr in start.attributes().with_checks(false).flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        element.attributes.push((key, value));
    }
    element
}

/// Reads until the element opened by `root` closes, building its tree.
///
/// The stack replaces an explicit depth counter: a nested child with
/// the root's own local name just pushes one more frame, so only the
/// matching end tag at depth zero completes the tree.
fn read_subtree<R: BufRead>(reader: &mut Reader<R>, root: Element) -> LoaderResult<Element> {
    let mut stack = vec![root];
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                stack.push(element_from_start(&start));
            }
            Event::Empty(start) => {
                let element = element_from_start(&start);
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(element);
                }
            }
            Event::Text(text) => {
                let raw = text.unescape()?;
                append_text(&mut stack, &raw);
            }
            Event::CData(cdata) => {
                let raw = String::from_utf8_lossy(&cdata.into_inner()).into_owned();
                append_text(&mut stack, &raw);
            }
            Event::End(end) => {
                let closes = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                if let Some(element) = stack.pop() {
                    if element.local_name != local_part(&closes) {
                        return Err(LoaderError::MismatchedEndTag {
                            expected: element.local_name,
                            found: local_part(&closes).to_string(),
                        });
                    }
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
            }
            Event::Eof => {
                return Err(LoaderError::TruncatedElement {
                    element: stack
                        .first()
                        .map(|e| e.local_name.clone())
                        .unwrap_or_default(),
                });
            }
            _ => {}
        }
    }
}

fn append_text(stack: &mut [Element], raw: &str) {
    let cleaned = clean_text(raw);
    if cleaned.is_empty() {
        return;
    }
    if let Some(element) = stack.last_mut() {
        match &mut element.text {
            Some(text) => {
                text.push(' ');
                text.push_str(&cleaned);
            }
            None => element.text = Some(cleaned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yields_namespaced_top_level_elements() {
        let doc = r#"<ns2:ExportActualMedicines xmlns:ns2="urn:x">
            <ns2:Amp code="SAM1"><ns2:Data><ns2:Status>OK</ns2:Status></ns2:Data></ns2:Amp>
            <ns2:Amp code="SAM2"/>
        </ns2:ExportActualMedicines>"#;

        let elements: Vec<Element> = ElementStream::from_str(doc, "Amp").collect();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].attr("code"), Some("SAM1"));
        assert_eq!(
            elements[0].child("Data").and_then(|d| d.child_text("Status")),
            Some("OK")
        );
        // Self-closing element yielded without buffering.
        assert_eq!(elements[1].attr("code"), Some("SAM2"));
        assert!(elements[1].children.is_empty());
    }

    #[test]
    fn test_same_named_nested_elements_do_not_terminate_early() {
        let doc = r#"<root>
            <Item code="outer"><Item code="inner"><deep/></Item><tail>t</tail></Item>
        </root>"#;

        let elements: Vec<Element> = ElementStream::from_str(doc, "Item").collect();
        assert_eq!(elements.len(), 1);
        let outer = &elements[0];
        assert_eq!(outer.attr("code"), Some("outer"));
        assert_eq!(outer.child_text("tail"), Some("t"));
        let inner = outer.child("Item").expect("nested item kept as child");
        assert_eq!(inner.attr("code"), Some("inner"));
    }

    #[test]
    fn test_malformed_fragment_is_skipped_stream_continues() {
        let doc = r#"<root>
            <Item code="bad"><a></b></Item>
            <Item code="good1"><x>1</x></Item>
            <Item code="good2"/>
        </root>"#;

        let mut stream = ElementStream::from_str(doc, "Item");
        // Every valid element after the malformed one is still yielded.
        let first = stream.next().expect("valid element after malformed one");
        assert_eq!(first.attr("code"), Some("good1"));
        let second = stream.next().expect("second valid element");
        assert_eq!(second.attr("code"), Some("good2"));
        assert!(stream.next().is_none());
        assert_eq!(stream.yielded(), 2);
        assert_eq!(stream.errors(), 1);
    }

    #[test]
    fn test_target_with_mismatched_end_tag_yields_nothing() {
        let doc = "<root><Item><a></b></Item></root>";
        let mut stream = ElementStream::from_str(doc, "Item");
        assert!(stream.next().is_none());
        assert_eq!(stream.errors(), 1);
    }

    #[test]
    fn test_truncated_file_yields_nothing_more() {
        let doc = r#"<root><Item code="cut"><x>"#;
        let mut stream = ElementStream::from_str(doc, "Item");
        assert!(stream.next().is_none());
        assert_eq!(stream.errors(), 1);
    }

    #[test]
    fn test_text_is_cleaned_and_collapsed() {
        let doc = "<root><Item><Note>  een \n  <b>twee</b> </Note></Item></root>";
        let elements: Vec<Element> = ElementStream::from_str(doc, "Item").collect();
        let note = elements[0].child("Note").unwrap();
        assert_eq!(note.flattened_text(), "een twee");
    }

    #[test]
    fn test_cdata_markup_is_stripped() {
        let doc = "<root><Item><Content><![CDATA[per <i>os</i> toedienen]]></Content></Item></root>";
        let elements: Vec<Element> = ElementStream::from_str(doc, "Item").collect();
        assert_eq!(
            elements[0].child_text("Content"),
            Some("per os toedienen")
        );
    }
}
