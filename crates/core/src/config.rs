//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the triage engine. Library code never reads process-wide environment variables;
//! binaries read them and hand the raw values to the `*_from_env_value` helpers below.

use crate::constants::{
    ALTERNATIVES_RANGE, DEFAULT_CONFIDENCE_FLOOR, DEFAULT_MAX_ALTERNATIVES,
    DEFAULT_MIN_MATCHES, FALLBACK_BASE_CONFIDENCE,
};
use crate::{TriageError, TriageResult};
use std::path::PathBuf;

/// Scoring parameters for the triage engine.
///
/// The legacy matching variants differed only in these numbers, so they are configuration
/// rather than separate code paths.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    min_matches: usize,
    confidence_floor: f64,
    max_alternatives: usize,
    fallback_confidence: f64,
}

impl EngineConfig {
    /// Create a new `EngineConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::InvalidConfig`] if `min_matches` is zero, `confidence_floor` is
    /// outside `[0, 1]`, or `max_alternatives` is outside `2..=4`.
    pub fn new(
        min_matches: usize,
        confidence_floor: f64,
        max_alternatives: usize,
    ) -> TriageResult<Self> {
        if min_matches == 0 {
            return Err(TriageError::InvalidConfig(
                "min_matches must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&confidence_floor) {
            return Err(TriageError::InvalidConfig(format!(
                "confidence_floor must be within [0, 1], got {confidence_floor}"
            )));
        }
        if !ALTERNATIVES_RANGE.contains(&max_alternatives) {
            return Err(TriageError::InvalidConfig(format!(
                "max_alternatives must be within {}..={}, got {max_alternatives}",
                ALTERNATIVES_RANGE.start(),
                ALTERNATIVES_RANGE.end()
            )));
        }

        Ok(Self {
            min_matches,
            confidence_floor,
            max_alternatives,
            fallback_confidence: FALLBACK_BASE_CONFIDENCE,
        })
    }

    pub fn min_matches(&self) -> usize {
        self.min_matches
    }

    pub fn confidence_floor(&self) -> f64 {
        self.confidence_floor
    }

    pub fn max_alternatives(&self) -> usize {
        self.max_alternatives
    }

    pub fn fallback_confidence(&self) -> f64 {
        self.fallback_confidence
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_matches: DEFAULT_MIN_MATCHES,
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
            fallback_confidence: FALLBACK_BASE_CONFIDENCE,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the minimum match count from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default.
pub fn min_matches_from_env_value(value: Option<String>) -> TriageResult<usize> {
    match non_blank(value) {
        None => Ok(DEFAULT_MIN_MATCHES),
        Some(v) => v.parse::<usize>().map_err(|e| {
            TriageError::InvalidConfig(format!("MEDICHAIN_MIN_MATCHES '{v}': {e}"))
        }),
    }
}

/// Parse the confidence floor from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default.
pub fn confidence_floor_from_env_value(value: Option<String>) -> TriageResult<f64> {
    match non_blank(value) {
        None => Ok(DEFAULT_CONFIDENCE_FLOOR),
        Some(v) => v.parse::<f64>().map_err(|e| {
            TriageError::InvalidConfig(format!("MEDICHAIN_CONFIDENCE_FLOOR '{v}': {e}"))
        }),
    }
}

/// Parse the alternatives count from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default.
pub fn max_alternatives_from_env_value(value: Option<String>) -> TriageResult<usize> {
    match non_blank(value) {
        None => Ok(DEFAULT_MAX_ALTERNATIVES),
        Some(v) => v.parse::<usize>().map_err(|e| {
            TriageError::InvalidConfig(format!("MEDICHAIN_MAX_ALTERNATIVES '{v}': {e}"))
        }),
    }
}

/// Interpret the knowledge-file override; blank means "use the built-in tables".
pub fn knowledge_file_from_env_value(value: Option<String>) -> Option<PathBuf> {
    non_blank(value).map(PathBuf::from)
}

/// Build an [`EngineConfig`] from the three raw environment values.
pub fn engine_config_from_env_values(
    min_matches: Option<String>,
    confidence_floor: Option<String>,
    max_alternatives: Option<String>,
) -> TriageResult<EngineConfig> {
    EngineConfig::new(
        min_matches_from_env_value(min_matches)?,
        confidence_floor_from_env_value(confidence_floor)?,
        max_alternatives_from_env_value(max_alternatives)?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.min_matches(), 2);
        assert_eq!(cfg.confidence_floor(), 0.7);
        assert_eq!(cfg.max_alternatives(), 3);
        assert_eq!(cfg.fallback_confidence(), 0.60);
    }

    #[test]
    fn blank_env_values_fall_back_to_defaults() {
        let cfg = engine_config_from_env_values(None, Some("  ".into()), Some(String::new()))
            .expect("defaults are valid");
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn env_values_are_parsed() {
        let cfg = engine_config_from_env_values(
            Some("3".into()),
            Some(" 0.5 ".into()),
            Some("4".into()),
        )
        .expect("valid values");
        assert_eq!(cfg.min_matches(), 3);
        assert_eq!(cfg.confidence_floor(), 0.5);
        assert_eq!(cfg.max_alternatives(), 4);
    }

    #[test]
    fn rejects_unparseable_values() {
        let err = min_matches_from_env_value(Some("two".into())).unwrap_err();
        assert!(matches!(err, TriageError::InvalidConfig(msg) if msg.contains("MEDICHAIN_MIN_MATCHES")));
        assert!(confidence_floor_from_env_value(Some("high".into())).is_err());
        assert!(max_alternatives_from_env_value(Some("-1".into())).is_err());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(EngineConfig::new(0, 0.7, 3).is_err());
        assert!(EngineConfig::new(2, 1.5, 3).is_err());
        assert!(EngineConfig::new(2, -0.1, 3).is_err());
        assert!(EngineConfig::new(1, 0.0, 2).is_ok());
    }

    #[test]
    fn alternatives_count_is_bounded() {
        for n in [0, 1, 5, 10] {
            let err = EngineConfig::new(2, 0.7, n).unwrap_err();
            assert!(matches!(err, TriageError::InvalidConfig(msg) if msg.contains("max_alternatives")));
        }
        for n in 2..=4 {
            assert_eq!(EngineConfig::new(2, 0.7, n).unwrap().max_alternatives(), n);
        }
        assert!(engine_config_from_env_values(None, None, Some("0".into())).is_err());
    }

    #[test]
    fn knowledge_override_ignores_blank() {
        assert_eq!(knowledge_file_from_env_value(Some(" ".into())), None);
        assert_eq!(
            knowledge_file_from_env_value(Some("/etc/kb.yaml".into())),
            Some(PathBuf::from("/etc/kb.yaml"))
        );
    }
}
