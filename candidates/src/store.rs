//! In-memory candidate store.

use std::collections::HashMap;

use tracing::debug;

/// Mapping from candidate key to usage score.
///
/// The store has no intrinsic order; [`crate::rank`] imposes one when the
/// candidates are presented. Keys are never removed: once learned, a
/// candidate stays until the store file is deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateStore {
    scores: HashMap<String, u64>,
}

impl CandidateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a key with an explicit score.
    ///
    /// Empty keys are ignored.
    pub fn insert(&mut self, key: impl Into<String>, score: u64) {
        let key = key.into();
        if key.is_empty() {
            return;
        }
        self.scores.insert(key, score);
    }

    /// Merge freshly discovered keys into the store.
    ///
    /// Unknown keys are added with a score of zero. Keys already present keep
    /// their score whether or not discovery reported them again. Returns the
    /// number of keys that were added.
    pub fn merge<I, S>(&mut self, discovered: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for key in discovered {
            let key = key.into();
            if key.is_empty() || self.scores.contains_key(&key) {
                continue;
            }
            self.scores.insert(key, 0);
            added += 1;
        }
        debug!("Merged discovery results: {added} new, {} total", self.len());
        added
    }

    /// Record a confirmed selection of `key`.
    ///
    /// Returns the new score, or `None` when the key is unknown; unknown keys
    /// are not learned from a selection alone.
    pub fn increment(&mut self, key: &str) -> Option<u64> {
        let score = self.scores.get_mut(key)?;
        *score = score.saturating_add(1);
        Some(*score)
    }

    /// Score for `key`, if present.
    pub fn get(&self, key: &str) -> Option<u64> {
        self.scores.get(key).copied()
    }

    /// Whether `key` is known.
    pub fn contains(&self, key: &str) -> bool {
        self.scores.contains_key(key)
    }

    /// All known keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }

    /// All (key, score) pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.scores.iter().map(|(key, score)| (key.as_str(), *score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for CandidateStore {
    fn from_iter<T: IntoIterator<Item = (K, u64)>>(iter: T) -> Self {
        let mut store = Self::new();
        for (key, score) in iter {
            store.insert(key, score);
        }
        store
    }
}
