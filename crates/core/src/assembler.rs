//! Diagnosis result assembly.
//!
//! Pure transformation from matcher output into the `DiagnosisResult` handed to callers.
//! Every result carries the medical disclaimer, the fallback included.

use crate::confidence::{adjust, ConfidenceLevel};
use crate::config::EngineConfig;
use crate::constants::{FALLBACK_CONDITION_NAME, IMMEDIATE_CARE_NOTICE, MEDICAL_DISCLAIMER};
use crate::extractor::DetectedSymptoms;
use crate::knowledge::Recommendations;
use crate::matcher::ConditionScore;

/// A non-primary candidate condition.
#[derive(Clone, Debug, PartialEq)]
pub struct Alternative {
    pub condition: String,
    /// Fraction of the condition's symptoms that were detected.
    pub match_score: f64,
    /// Base confidence adjusted by `match_score`.
    pub confidence: f64,
}

/// Outcome of a single triage run. Never persisted by this crate.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagnosisResult {
    pub primary_condition: String,
    pub final_confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub detected_symptoms: DetectedSymptoms,
    pub match_score: f64,
    pub alternatives: Vec<Alternative>,
    pub recommendations: Recommendations,
    /// The selected condition calls for immediate care.
    pub urgent: bool,
    /// No condition passed the match gate; `primary_condition` is the generic fallback.
    pub fallback: bool,
    pub disclaimer: &'static str,
}

/// What the matcher selected as primary.
#[derive(Clone, Debug)]
pub enum Primary<'a> {
    Matched(ConditionScore<'a>),
    /// Symptoms were detected but nothing reached the gate.
    Unspecified,
}

/// Conservative advice used with the fallback condition.
pub fn fallback_recommendations() -> Recommendations {
    Recommendations {
        medications: vec![
            "Over-the-counter pain relief such as paracetamol may ease discomfort; follow package dosing"
                .into(),
        ],
        lifestyle: vec![
            "Rest and stay well hydrated".into(),
            "Monitor your symptoms and note any changes".into(),
        ],
        escalation_criteria: vec![
            "Symptoms worsen or new symptoms appear".into(),
            "Symptoms persist for more than a few days".into(),
            "You are concerned about your health".into(),
        ],
    }
}

fn escalation_with_notice(recommendations: &Recommendations) -> Recommendations {
    let mut out = recommendations.clone();
    let has_notice = out
        .escalation_criteria
        .iter()
        .any(|c| c.to_uppercase().contains("SEEK IMMEDIATE CARE"));
    if !has_notice {
        out.escalation_criteria
            .insert(0, IMMEDIATE_CARE_NOTICE.to_string());
    }
    out
}

/// Package the primary selection, detected symptoms and alternatives into a result.
pub fn assemble(
    primary: Primary<'_>,
    detected: DetectedSymptoms,
    alternatives: &[ConditionScore<'_>],
    config: &EngineConfig,
) -> DiagnosisResult {
    let floor = config.confidence_floor();

    let (name, base, match_score, recommendations, urgent, fallback) = match primary {
        Primary::Matched(selected) => {
            let condition = selected.condition;
            let recommendations = if condition.is_urgent() {
                escalation_with_notice(condition.recommendations())
            } else {
                condition.recommendations().clone()
            };
            (
                condition.name().to_string(),
                condition.base_confidence(),
                selected.score,
                recommendations,
                condition.is_urgent(),
                false,
            )
        }
        Primary::Unspecified => (
            FALLBACK_CONDITION_NAME.to_string(),
            config.fallback_confidence(),
            0.0,
            fallback_recommendations(),
            false,
            true,
        ),
    };

    let final_confidence = adjust(base, match_score, floor);

    DiagnosisResult {
        primary_condition: name,
        final_confidence,
        confidence_level: ConfidenceLevel::from_confidence(final_confidence),
        detected_symptoms: detected,
        match_score,
        alternatives: alternatives
            .iter()
            .map(|alt| Alternative {
                condition: alt.condition.name().to_string(),
                match_score: alt.score,
                confidence: adjust(alt.condition.base_confidence(), alt.score, floor),
            })
            .collect(),
        recommendations,
        urgent,
        fallback,
        disclaimer: MEDICAL_DISCLAIMER,
    }
}
