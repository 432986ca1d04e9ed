//! CSS custom-property tables
//!
//! Component and scope definitions are flat maps from a custom-property name
//! (`--one-gap`, `--box-padding`, ...) to a CSS value. Values are stored as raw
//! JSON so documents written by other tools survive a load/save cycle, but
//! only string values are ever rendered as declarations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Insertion-ordered map of CSS custom properties.
///
/// Order is significant: it is the order declarations are emitted in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap(IndexMap<String, Value>);

impl PropertyMap {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert or replace a property, returning the previous value.
    ///
    /// Replacing keeps the property's original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Remove a property, preserving the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Get a property only if its value is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over every entry, including non-string values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over renderable declarations: entries whose value is a string.
    pub fn declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.as_str(), s)))
    }

    /// Number of renderable declarations.
    pub fn declaration_count(&self) -> usize {
        self.declarations().count()
    }

    /// Layer `overlay` on top of `self`.
    ///
    /// The result contains only string-valued entries. Keys from `self` keep
    /// their position; keys only present in `overlay` are appended.
    pub fn layered(&self, overlay: &PropertyMap) -> PropertyMap {
        let mut out = PropertyMap::new();
        for (name, value) in self.declarations().chain(overlay.declarations()) {
            out.insert(name, value);
        }
        out
    }
}

impl<K, V> FromIterator<(K, V)> for PropertyMap
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for PropertyMap
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a PropertyMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
