//! Symptom extraction from free text.
//!
//! Matching is case-insensitive substring containment against the keyword dictionary.
//! There is no stemming, tokenisation or negation handling: "no fever" still yields `fever`.

use crate::knowledge::KnowledgeBase;
use std::collections::BTreeSet;
use triage_types::SymptomToken;

/// Detected symptoms, ordered by token so output is stable.
pub type DetectedSymptoms = BTreeSet<SymptomToken>;

/// Scan `text` for every symptom in the dictionary.
///
/// Never fails; empty or unrecognised input yields an empty set.
pub fn extract(kb: &KnowledgeBase, text: &str) -> DetectedSymptoms {
    let lowered = text.to_lowercase();
    if lowered.trim().is_empty() {
        return DetectedSymptoms::new();
    }

    kb.keywords()
        .iter()
        .filter(|k| k.matches_lowercase(&lowered))
        .map(|k| k.token().clone())
        .collect()
}
