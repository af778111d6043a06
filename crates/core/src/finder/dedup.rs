//! Deduplication of merged candidates by info_hash.

use std::collections::HashSet;

use super::Candidate;

/// Deduplicate candidates by info_hash.
///
/// The first candidate seen for a given hash is kept and later ones are
/// dropped. Candidates with an empty info_hash have no identity and are
/// always kept. Relative order is preserved.
pub fn deduplicate_candidates(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len());

    candidates
        .into_iter()
        .filter(|c| c.info_hash.is_empty() || seen.insert(c.info_hash.clone()))
        .collect()
}
