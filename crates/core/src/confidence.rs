//! Confidence adjustment and bucketing.

use crate::constants::{HIGH_CONFIDENCE_THRESHOLD, MODERATE_CONFIDENCE_THRESHOLD};

/// Qualitative bucket for a final confidence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Moderate,
    Low,
}

impl ConfidenceLevel {
    /// Bucket a final confidence; lower bounds are inclusive.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= HIGH_CONFIDENCE_THRESHOLD {
            ConfidenceLevel::High
        } else if confidence >= MODERATE_CONFIDENCE_THRESHOLD {
            ConfidenceLevel::Moderate
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "High",
            ConfidenceLevel::Moderate => "Moderate",
            ConfidenceLevel::Low => "Low",
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blend a condition's base confidence with how completely it matched.
///
/// `final = base * (floor + (1 - floor) * match_score)`, clamped to `[0, base]`.
/// With the default floor of 0.7 a perfect match keeps the full base confidence and a
/// zero score keeps 70% of it.
pub fn adjust(base_confidence: f64, match_score: f64, floor: f64) -> f64 {
    let base = base_confidence.clamp(0.0, 1.0);
    let score = match_score.clamp(0.0, 1.0);
    let floor = floor.clamp(0.0, 1.0);
    (base * (floor + (1.0 - floor) * score)).clamp(0.0, base)
}
