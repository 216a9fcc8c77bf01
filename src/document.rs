use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A parsed configuration document.
///
/// Top-level options and sections share one ordered namespace and keep their insertion order.
/// [`crate::write`] renders in that order, except that top-level options always come before the
/// first section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    entries: IndexMap<String, Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Value(Value),
    Section(Section),
}

/// The options declared under one `[name]` header. Sections never contain other sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Section {
    options: IndexMap<String, Value>,
}

/// An option's value.
///
/// `Unset` means the defining line had no delimiter at all, which is not the same thing as an
/// empty string (`key =`). Multiline values keep their lines joined with `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Unset,
    Raw(String),
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Look up a top-level option. Sections are not returned.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.entries.get(key)? {
            Entry::Value(value) => Some(value),
            Entry::Section(_) => None,
        }
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        match self.entries.get(name)? {
            Entry::Section(section) => Some(section),
            Entry::Value(_) => None,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Top-level options in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().filter_map(|(key, entry)| match entry {
            Entry::Value(value) => Some((key.as_str(), value)),
            Entry::Section(_) => None,
        })
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.entries.iter().filter_map(|(name, entry)| match entry {
            Entry::Section(section) => Some((name.as_str(), section)),
            Entry::Value(_) => None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace an entry, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, entry: impl Into<Entry>) -> Option<Entry> {
        self.entries.insert(key.into(), entry.into())
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.entries.get_mut(key)
    }

    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Get the named section, creating an empty one at the end if it does not exist yet. Returns
    /// `None` if the name is taken by a top-level option.
    pub(crate) fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        if !self.entries.contains_key(name) {
            self.entries
                .insert(name.to_owned(), Entry::Section(Section::new()));
        }

        match self.entries.get_mut(name)? {
            Entry::Section(section) => Some(section),
            Entry::Value(_) => None,
        }
    }
}

// Equality is order-sensitive; `IndexMap`'s own `PartialEq` is not.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for Document {}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::read(s)
    }
}

/// Canonical text, as [`crate::write`] produces it. Top-level options inserted after a section
/// are moved above all sections.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::writer::write_document(f, self)
    }
}

impl<K, E> FromIterator<(K, E)> for Document
where
    K: Into<String>,
    E: Into<Entry>,
{
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, entry)| (key.into(), entry.into()))
                .collect(),
        }
    }
}

impl Section {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.options.iter().map(|(key, value)| (key.as_str(), value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Insert or replace an option, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.options.insert(key.into(), value.into())
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.options.get_mut(key)
    }

    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.options.iter().eq(other.options.iter())
    }
}

impl Eq for Section {}

impl<K, V> FromIterator<(K, V)> for Section
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            options: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl Value {
    /// The text of the value, or `None` when unset.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Unset => None,
            Self::Raw(s) => Some(s),
        }
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Unset or empty. Both are written back as a bare key.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        self.as_str().is_none_or(str::is_empty)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Raw(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Raw(value.to_owned())
    }
}

impl From<Option<String>> for Value {
    fn from(value: Option<String>) -> Self {
        value.map_or(Value::Unset, Value::Raw)
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Entry::Value(value)
    }
}

impl From<&str> for Entry {
    fn from(value: &str) -> Self {
        Entry::Value(value.into())
    }
}

impl From<Section> for Entry {
    fn from(section: Section) -> Self {
        Entry::Section(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_is_distinct_from_empty() {
        assert_ne!(Value::Unset, Value::from(""));
        assert!(Value::Unset.is_unset());
        assert!(!Value::from("").is_unset());
        assert!(Value::from("").is_falsy());
        assert!(!Value::from("x").is_falsy());
    }

    #[test]
    fn keeps_insertion_order() {
        let doc: Document = [("b", "1"), ("a", "2"), ("c", "3")].into_iter().collect();
        let keys = doc.entries().map(|(key, _)| key).collect::<Vec<_>>();

        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn equality_depends_on_order() {
        let xy: Section = [("x", "1"), ("y", "2")].into_iter().collect();
        let yx: Section = [("y", "2"), ("x", "1")].into_iter().collect();

        assert_ne!(xy, yx);
        assert_eq!(xy, xy.clone());

        let ab: Document = [("a", "1"), ("b", "2")].into_iter().collect();
        let ba: Document = [("b", "2"), ("a", "1")].into_iter().collect();

        assert_ne!(ab, ba);

        let mut nested_xy = Document::new();
        nested_xy.insert("s", xy);
        let mut nested_yx = Document::new();
        nested_yx.insert("s", yx);

        assert_ne!(nested_xy, nested_yx);
    }

    #[test]
    fn value_and_section_lookups_do_not_cross() {
        let mut doc = Document::new();
        doc.insert("name", "joe");
        doc.insert("main", [("age", "22")].into_iter().collect::<Section>());

        assert!(doc.section("name").is_none());
        assert!(doc.value("main").is_none());
        assert_eq!(
            doc.section("main").and_then(|s| s.get("age")),
            Some(&Value::from("22"))
        );
    }

    #[test]
    fn json_shape() {
        let mut doc = Document::new();
        doc.insert("flag", Value::Unset);
        doc.insert("name", "joe");
        doc.insert("main", [("age", "22")].into_iter().collect::<Section>());

        let json = serde_json::to_string(&doc).expect("document should serialize");

        assert_eq!(json, r#"{"flag":null,"name":"joe","main":{"age":"22"}}"#);

        let back: Document = serde_json::from_str(&json).expect("document should deserialize");

        assert_eq!(back, doc);
    }

    #[test]
    fn json_rejects_nested_sections() {
        let result = serde_json::from_str::<Document>(r#"{"a":{"b":{"c":"d"}}}"#);

        assert!(result.is_err());
    }
}
