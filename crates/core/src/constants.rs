//! Constants used throughout the triage core crate.
//!
//! Scoring defaults, fallback values and user-facing strings live here so the engine,
//! the HTTP layer and the CLI agree on them.

/// Minimum number of overlapping symptoms before a condition can be selected.
pub const DEFAULT_MIN_MATCHES: usize = 2;

/// Share of the base confidence kept regardless of match quality.
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.7;

/// Number of alternative conditions surfaced next to the primary diagnosis.
pub const DEFAULT_MAX_ALTERNATIVES: usize = 3;

/// Accepted range for `max_alternatives`.
pub const ALTERNATIVES_RANGE: std::ops::RangeInclusive<usize> = 2..=4;

/// Final confidence at or above which the level is "High".
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.80;

/// Final confidence at or above which the level is "Moderate".
pub const MODERATE_CONFIDENCE_THRESHOLD: f64 = 0.65;

/// Name reported when symptoms were found but no condition passed the gate.
pub const FALLBACK_CONDITION_NAME: &str = "Unspecified Condition";

/// Base confidence used for the fallback condition.
pub const FALLBACK_BASE_CONFIDENCE: f64 = 0.60;

/// Escalation marker carried by urgent conditions.
pub const IMMEDIATE_CARE_NOTICE: &str =
    "SEEK IMMEDIATE CARE: call emergency services or go to the nearest emergency department";

/// Disclaimer attached to every diagnosis, fallback included.
pub const MEDICAL_DISCLAIMER: &str = "This AI-assisted assessment is for informational purposes only \
and is not a substitute for professional medical evaluation, diagnosis or treatment. \
Always consult a qualified healthcare provider about your symptoms.";

/// Guidance returned when no symptom could be recognised in the input.
pub const REPHRASE_SUGGESTIONS: &[&str] = &[
    "Describe specific symptoms, for example \"fever\", \"headache\" or \"sore throat\"",
    "Mention where it hurts and how it feels, for example \"chest pain\" or \"stomach ache\"",
    "List each symptom you are experiencing, separated by commas",
    "Include how long the symptoms have lasted",
];

/// Maximum accepted age in years.
pub const MAX_AGE_YEARS: u8 = 130;

/// Maximum accepted length of the free-text gender field.
pub const MAX_GENDER_LEN: usize = 32;

/// Built-in knowledge base, compiled into the binary.
pub const DEFAULT_KNOWLEDGE_YAML: &str = include_str!("../knowledge/default.yaml");
