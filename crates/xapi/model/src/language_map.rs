//! Locale-tagged display text.

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered mapping from RFC 5646 language tag to display string.
///
/// Iteration follows first-insertion order, which is also the order the map
/// is written on the wire. Lookup is exact-tag only; there is no locale
/// negotiation. Text whose locale is unknown lives under the reserved
/// [`LanguageMap::UNDETERMINED`] tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageMap(IndexMap<String, String>);

impl LanguageMap {
    /// The reserved tag for display text with no known locale.
    pub const UNDETERMINED: &'static str = "und";

    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map holding a single entry under the `und` tag.
    ///
    /// This is the only implicit insertion rule in the model; it backs the
    /// shortcut constructors that accept bare display text.
    pub fn of_undetermined(text: impl Into<String>) -> Self {
        let mut map = Self::new();
        map.set(Self::UNDETERMINED, text);
        map
    }

    /// Inserts or overwrites the entry for `tag`, preserving the position of
    /// an existing entry.
    pub fn set(&mut self, tag: impl Into<String>, text: impl Into<String>) {
        self.0.insert(tag.into(), text.into());
    }

    /// Exact-match lookup, including the `und` tag.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.0.get(tag).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LanguageMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (tag, text) in iter {
            map.set(tag, text);
        }
        map
    }
}

// Map equality ignores insertion order, so hashing goes through a sorted
// view to keep equal maps hashing equally.
impl Hash for LanguageMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut entries: Vec<_> = self.0.iter().collect();
        entries.sort_by_key(|(k, _)| k.as_str());
        for (tag, text) in entries {
            tag.hash(state);
            text.hash(state);
        }
    }
}
