//! The namespace-agnostic element model.
//!
//! Every parsed XML fragment becomes an [`Element`] tree. Tag and
//! attribute lookups match on the local part of the name only, so the
//! transformers never see which namespace prefix (`ns2:`, `ns3:`, ...)
//! a given export file happened to use.

use std::sync::OnceLock;

use regex::Regex;
use sam_types::LangMap;

/// Returns the local part of a possibly-prefixed XML name.
pub fn local_part(name: &str) -> &str {
    match name.rsplit_once(':') {
        Some((_, local)) => local,
        None => name,
    }
}

fn markup_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("static regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Strips embedded markup and collapses runs of whitespace.
///
/// Legal text content frequently carries HTML fragments inside CDATA;
/// only the plain text is kept.
pub fn clean_text(raw: &str) -> String {
    let stripped = markup_re().replace_all(raw, " ");
    whitespace_re().replace_all(stripped.trim(), " ").into_owned()
}

/// A parsed XML element: local name, attributes, direct text, children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Tag name with any namespace prefix removed.
    pub local_name: String,
    /// Attributes as `(name, value)`; names keep their prefix, lookup
    /// is by local part.
    pub attributes: Vec<(String, String)>,
    /// Direct text content, markup-stripped and whitespace-collapsed.
    pub text: Option<String>,
    /// Child elements in document order.
    pub children: Vec<Element>,
}

impl Element {
    /// Creates an element with the given (possibly prefixed) tag name.
    pub fn new(name: &str) -> Self {
        Element {
            local_name: local_part(name).to_string(),
            ..Default::default()
        }
    }

    /// Attribute value by local name: `attr("lang")` matches both
    /// `lang="fr"` and `xml:lang="fr"`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| local_part(key) == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local_name == name)
    }

    /// All children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.local_name == name)
    }

    /// Text of the first child with the given local name.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text.as_deref())
    }

    /// All text in this subtree, joined and whitespace-collapsed.
    pub fn flattened_text(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text(&self, parts: &mut Vec<String>) {
        if let Some(text) = &self.text {
            if !text.is_empty() {
                parts.push(text.clone());
            }
        }
        for child in &self.children {
            child.collect_text(parts);
        }
    }

    /// Collects a multilingual value from children named `name`.
    ///
    /// Two source shapes are accepted:
    /// - repeated children with a language attribute:
    ///   `<Name xml:lang="fr">...</Name><Name xml:lang="nl">...</Name>`
    /// - one wrapper whose children are language-coded tags:
    ///   `<Name><Fr>...</Fr><Nl>...</Nl></Name>`
    pub fn lang_map(&self, name: &str) -> LangMap {
        let mut map = LangMap::new();
        for child in self.children_named(name) {
            if let Some(lang) = child.attr("lang") {
                let text = child.flattened_text();
                if !text.is_empty() {
                    map.insert(lang, text);
                }
            } else {
                for lang_child in &child.children {
                    let text = lang_child.flattened_text();
                    if !text.is_empty() {
                        map.insert(&lang_child.local_name, text);
                    }
                }
            }
        }
        map
    }
}
