//! Presentation order for candidates.

use std::cmp::Reverse;

use crate::store::CandidateStore;

/// A candidate as presented to the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub key: String,
    pub score: u64,
}

/// Order the store's entries for presentation.
///
/// Higher scores come first; equal scores are ordered by key length
/// (in characters), shortest first. Ties beyond that keep no particular order.
pub fn rank(store: &CandidateStore) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = store
        .iter()
        .map(|(key, score)| Candidate {
            key: key.to_string(),
            score,
        })
        .collect();
    candidates.sort_by_key(|c| (Reverse(c.score), c.key.chars().count()));
    candidates
}

/// Ranked keys, one per line, as fed to the picker's stdin.
pub fn picker_input(store: &CandidateStore) -> String {
    let mut input = String::new();
    for candidate in rank(store) {
        input.push_str(&candidate.key);
        input.push('\n');
    }
    input
}
