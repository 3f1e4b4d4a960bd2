//! Translation index: existing translations keyed by entry identity.
//!
//! An entry is identified by its section path, unit id and a digest of its
//! source text. Editing the source string therefore orphans the old
//! translation instead of carrying it over to text it no longer matches.

use std::fmt;

use indexmap::IndexMap;
use xxhash_rust::xxh64::xxh64;

use crate::xliff::tree::Element;
use crate::xliff::{SectionExt, TransUnitExt, XliffDocument, units};

/// Stable digest of a source string (XXH64, seed 0, over UTF-8 bytes).
pub fn source_digest(text: &str) -> u64 {
    xxh64(text.as_bytes(), 0)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
    pub original: String,
    pub id: String,
    pub source_digest: u64,
}

impl EntryKey {
    pub fn new(original: &str, id: &str, source: &str) -> Self {
        Self {
            original: original.to_string(),
            id: id.to_string(),
            source_digest: source_digest(source),
        }
    }

    /// Key for `unit` inside `section`.
    pub fn of(section: &Element, unit: &Element) -> Self {
        Self::new(
            section.original(),
            unit.unit_id().unwrap_or_default(),
            &unit.source_text(),
        )
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{:016x}", self.original, self.id, self.source_digest)
    }
}

/// Existing translations of one locale, built fresh per run.
#[derive(Debug, Default, Clone)]
pub struct TranslationIndex {
    entries: IndexMap<EntryKey, String>,
}

impl TranslationIndex {
    /// Index every unit that carries a target. Units without one are left
    /// out; on duplicate keys the later unit wins.
    pub fn build(doc: &XliffDocument) -> Self {
        let mut index = Self::default();

        for section in doc.sections() {
            for unit in units(section) {
                if let Some(target) = unit.targets().last() {
                    index.insert(EntryKey::of(section, unit), target.text());
                }
            }
        }

        tracing::debug!(entries = index.len(), "built translation index");
        index
    }

    pub fn insert(&mut self, key: EntryKey, text: String) {
        self.entries.insert(key, text);
    }

    pub fn get(&self, key: &EntryKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntryKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }
}
