//! Point-in-time view of the live documents in a bucket.

use chrono::{DateTime, Utc};
use std::slice;

use mockbucket_core::document::DocumentRecord;

/// The documents that were live at one instant.
///
/// Expiry is evaluated once, against [`taken_at`](Self::taken_at), for the whole view, so a
/// record cannot drop out halfway through an iteration. Entries are ordered by key.
#[derive(Debug, Clone, Default)]
pub struct ActiveEntries {
    taken_at: DateTime<Utc>,
    entries: Vec<(String, DocumentRecord)>,
}

impl ActiveEntries {
    /// Builds a view from entries already filtered and sorted by key.
    pub(crate) fn new(taken_at: DateTime<Utc>, entries: Vec<(String, DocumentRecord)>) -> Self {
        Self { taken_at, entries }
    }

    /// The instant expiry was evaluated at.
    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.entries.iter().map(|(_, record)| record)
    }

    pub fn iter(&self) -> slice::Iter<'_, (String, DocumentRecord)> {
        self.entries.iter()
    }

    pub fn get(&self, key: &str) -> Option<&DocumentRecord> {
        self.entries
            .binary_search_by(|(probe, _)| probe.as_str().cmp(key))
            .ok()
            .map(|index| &self.entries[index].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl IntoIterator for ActiveEntries {
    type Item = (String, DocumentRecord);
    type IntoIter = std::vec::IntoIter<(String, DocumentRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ActiveEntries {
    type Item = &'a (String, DocumentRecord);
    type IntoIter = slice::Iter<'a, (String, DocumentRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
