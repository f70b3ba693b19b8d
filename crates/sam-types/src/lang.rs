//! Multilingual text values.
//!
//! Most named entities in the formulary export carry their name in
//! several languages (nl/fr/de/en). A `LangMap` collects the variants
//! keyed by lowercase language code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A multilingual string, keyed by lowercase language code.
///
/// # Examples
///
/// ```
/// use sam_types::LangMap;
///
/// let mut name = LangMap::new();
/// name.insert("nl", "Paracetamol");
/// name.insert("fr", "Paracétamol");
///
/// assert_eq!(name.get("fr"), Some("Paracétamol"));
/// assert_eq!(name.get("de"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LangMap(BTreeMap<String, String>);

impl LangMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a translation. The language code is lowercased.
    pub fn insert(&mut self, lang: &str, value: impl Into<String>) {
        self.0.insert(lang.to_ascii_lowercase(), value.into());
    }

    /// Returns the translation for a language code, if present.
    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0.get(&lang.to_ascii_lowercase()).map(String::as_str)
    }

    /// Returns true if no translation is present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of translations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Serializes the map as a compact JSON object for storage in a
    /// single text column.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

impl FromIterator<(String, String)> for LangMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (lang, value) in iter {
            map.insert(&lang, value);
        }
        map
    }
}
