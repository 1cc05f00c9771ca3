//! Condition matching over detected symptoms.
//!
//! Each condition is scored by fractional overlap: `matches / |condition.symptoms|`.
//! A condition is only eligible as the primary diagnosis once `matches` reaches the
//! configured minimum. The strictly greatest score wins; ties keep the earlier table entry.

use crate::config::EngineConfig;
use crate::extractor::DetectedSymptoms;
use crate::knowledge::{ConditionPattern, KnowledgeBase};

/// Overlap between one condition and the detected symptoms.
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionScore<'a> {
    pub condition: &'a ConditionPattern,
    pub matches: usize,
    pub score: f64,
}

/// Result of matching a detected set against the whole table.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchOutcome<'a> {
    /// Best eligible condition, or `None` when nothing passed the gate.
    pub best: Option<ConditionScore<'a>>,
    /// Other partially matched conditions, highest score first.
    pub alternatives: Vec<ConditionScore<'a>>,
}

/// Score a single condition.
pub fn score_condition<'a>(
    condition: &'a ConditionPattern,
    detected: &DetectedSymptoms,
) -> ConditionScore<'a> {
    let total = condition.symptoms().len();
    let matches = condition
        .symptoms()
        .iter()
        .filter(|s| detected.contains(*s))
        .count();
    let score = if total == 0 {
        0.0
    } else {
        matches as f64 / total as f64
    };

    ConditionScore {
        condition,
        matches,
        score,
    }
}

/// Match detected symptoms against every condition in the knowledge base.
pub fn match_conditions<'a>(
    kb: &'a KnowledgeBase,
    detected: &DetectedSymptoms,
    config: &EngineConfig,
) -> MatchOutcome<'a> {
    let scores: Vec<ConditionScore<'a>> = kb
        .conditions()
        .iter()
        .map(|c| score_condition(c, detected))
        .collect();

    let mut best_idx: Option<usize> = None;
    for (idx, candidate) in scores.iter().enumerate() {
        if candidate.matches < config.min_matches() {
            continue;
        }
        match best_idx {
            Some(b) if candidate.score <= scores[b].score => {}
            _ => best_idx = Some(idx),
        }
    }

    let mut alternatives: Vec<ConditionScore<'a>> = scores
        .iter()
        .enumerate()
        .filter(|(idx, s)| Some(*idx) != best_idx && s.matches > 0)
        .map(|(_, s)| s.clone())
        .collect();
    // Stable: equal scores stay in table order.
    alternatives.sort_by(|a, b| b.score.total_cmp(&a.score));
    alternatives.truncate(config.max_alternatives());

    MatchOutcome {
        best: best_idx.map(|idx| scores[idx].clone()),
        alternatives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract;
    use crate::knowledge::{KeywordPattern, Recommendations};
    use triage_types::SymptomToken;

    fn token(s: &str) -> SymptomToken {
        SymptomToken::new(s).unwrap()
    }

    fn detected(tokens: &[&str]) -> DetectedSymptoms {
        tokens.iter().map(|t| token(t)).collect()
    }

    fn advice() -> Recommendations {
        Recommendations {
            medications: vec!["m".into()],
            lifestyle: vec!["l".into()],
            escalation_criteria: vec!["e".into()],
        }
    }

    /// Small table: a, b, c, d tokens with overlapping conditions.
    fn small_kb(conditions: &[(&str, &[&str])]) -> KnowledgeBase {
        let keywords = ["a", "b", "c", "d"]
            .iter()
            .map(|t| KeywordPattern::new(token(t), vec![format!("sym-{t}")]).unwrap())
            .collect();
        let conditions = conditions
            .iter()
            .map(|(name, syms)| {
                ConditionPattern::new(
                    *name,
                    syms.iter().map(|s| token(s)).collect(),
                    0.8,
                    false,
                    advice(),
                )
                .unwrap()
            })
            .collect();
        KnowledgeBase::new(keywords, conditions).unwrap()
    }

    #[test]
    fn scores_fractional_overlap() {
        let kb = small_kb(&[("X", &["a", "b", "c", "d"])]);
        let s = score_condition(&kb.conditions()[0], &detected(&["a", "c", "z"]));
        assert_eq!(s.matches, 2);
        assert_eq!(s.score, 0.5);
    }

    #[test]
    fn picks_highest_score() {
        let kb = small_kb(&[("Wide", &["a", "b", "c", "d"]), ("Narrow", &["a", "b"])]);
        let outcome = match_conditions(&kb, &detected(&["a", "b"]), &EngineConfig::default());
        let best = outcome.best.expect("a match");
        assert_eq!(best.condition.name(), "Narrow");
        assert_eq!(best.score, 1.0);
        assert_eq!(outcome.alternatives.len(), 1);
        assert_eq!(outcome.alternatives[0].condition.name(), "Wide");
    }

    #[test]
    fn ties_go_to_first_condition_in_table_order() {
        let kb = small_kb(&[("First", &["a", "b"]), ("Second", &["b", "a"])]);
        let outcome = match_conditions(&kb, &detected(&["a", "b"]), &EngineConfig::default());
        assert_eq!(outcome.best.unwrap().condition.name(), "First");
        assert_eq!(outcome.alternatives[0].condition.name(), "Second");
    }

    #[test]
    fn single_overlap_never_selected_under_default_gate() {
        // "Solo" would score 1.0 but only has one matching symptom.
        let kb = small_kb(&[("Solo", &["a"]), ("Pair", &["a", "b"])]);
        let outcome = match_conditions(&kb, &detected(&["a"]), &EngineConfig::default());
        assert!(outcome.best.is_none());
        let names: Vec<_> = outcome.alternatives.iter().map(|s| s.condition.name()).collect();
        assert_eq!(names, ["Solo", "Pair"]);
    }

    #[test]
    fn gate_is_configurable() {
        let kb = small_kb(&[("Solo", &["a"])]);
        let relaxed = EngineConfig::new(1, 0.7, 3).unwrap();
        let outcome = match_conditions(&kb, &detected(&["a"]), &relaxed);
        assert_eq!(outcome.best.unwrap().condition.name(), "Solo");
    }

    #[test]
    fn empty_detection_has_no_best_and_no_alternatives() {
        let kb = KnowledgeBase::builtin().unwrap();
        let outcome = match_conditions(&kb, &DetectedSymptoms::new(), &EngineConfig::default());
        assert!(outcome.best.is_none());
        assert!(outcome.alternatives.is_empty());
    }

    #[test]
    fn alternatives_are_sorted_and_truncated() {
        let kb = small_kb(&[
            ("Best", &["a", "b"]),
            ("Quarter", &["a", "b", "c", "d"]),
            ("Third", &["a", "c", "d"]),
            ("Half", &["a", "c"]),
            ("None", &["c", "d"]),
        ]);
        let cfg = EngineConfig::new(2, 0.7, 2).unwrap();
        let outcome = match_conditions(&kb, &detected(&["a", "b"]), &cfg);
        assert_eq!(outcome.best.unwrap().condition.name(), "Best");
        let names: Vec<_> = outcome.alternatives.iter().map(|s| s.condition.name()).collect();
        assert_eq!(names, ["Quarter", "Half"]);
    }

    #[test]
    fn builtin_cold_and_flu_scenario() {
        let kb = KnowledgeBase::builtin().unwrap();
        let found = extract(&kb, "I have a fever, cough, and feel fatigued");
        let outcome = match_conditions(&kb, &found, &EngineConfig::default());
        let best = outcome.best.unwrap();
        assert_eq!(best.condition.name(), "Common Cold or Flu");
        assert_eq!(best.matches, 3);
        assert_eq!(best.score, 1.0);
        assert!(outcome.alternatives.len() <= 3);
        assert!(outcome
            .alternatives
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn builtin_single_headache_fails_gate() {
        let kb = KnowledgeBase::builtin().unwrap();
        let found = extract(&kb, "headache");
        let outcome = match_conditions(&kb, &found, &EngineConfig::default());
        assert!(outcome.best.is_none());
    }
}
