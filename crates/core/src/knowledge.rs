//! Keyword dictionary and condition pattern table.
//!
//! Responsibilities:
//! - Define the domain types the engine reads (`KeywordPattern`, `ConditionPattern`)
//! - Parse the YAML knowledge document through a strict wire model
//! - Validate every table invariant once, at load time
//!
//! Notes:
//! - A `KnowledgeBase` is immutable after construction and is shared behind `Arc`
//! - Table order is preserved; condition order decides ties in the matcher

use crate::constants::DEFAULT_KNOWLEDGE_YAML;
use crate::error::KnowledgeError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use triage_types::SymptomToken;

// ============================================================================
// Public domain-level types
// ============================================================================

/// A symptom token and the surface phrases that indicate it in free text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordPattern {
    token: SymptomToken,
    phrases: Vec<String>,
}

impl KeywordPattern {
    /// Build a pattern, lower-casing every phrase.
    pub fn new(token: SymptomToken, phrases: Vec<String>) -> Result<Self, KnowledgeError> {
        if phrases.is_empty() {
            return Err(KnowledgeError::EmptyPhrases(token.to_string()));
        }
        let mut normalised = Vec::with_capacity(phrases.len());
        for phrase in phrases {
            let phrase = phrase.trim().to_lowercase();
            if phrase.is_empty() {
                return Err(KnowledgeError::BlankPhrase(token.to_string()));
            }
            normalised.push(phrase);
        }
        Ok(Self {
            token,
            phrases: normalised,
        })
    }

    pub fn token(&self) -> &SymptomToken {
        &self.token
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Whether any phrase occurs in already lower-cased text.
    pub fn matches_lowercase(&self, lowered: &str) -> bool {
        self.phrases.iter().any(|p| lowered.contains(p.as_str()))
    }
}

/// Static advice attached to a condition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recommendations {
    pub medications: Vec<String>,
    pub lifestyle: Vec<String>,
    pub escalation_criteria: Vec<String>,
}

/// A named cluster of symptoms with a base confidence and advice.
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionPattern {
    name: String,
    symptoms: Vec<SymptomToken>,
    base_confidence: f64,
    urgent: bool,
    recommendations: Recommendations,
}

impl ConditionPattern {
    /// Build a condition pattern, checking everything that does not need the dictionary.
    pub fn new(
        name: impl Into<String>,
        symptoms: Vec<SymptomToken>,
        base_confidence: f64,
        urgent: bool,
        recommendations: Recommendations,
    ) -> Result<Self, KnowledgeError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(KnowledgeError::EmptyConditionName);
        }
        if symptoms.is_empty() {
            return Err(KnowledgeError::EmptyConditionSymptoms(name));
        }

        let mut seen = HashSet::new();
        for symptom in &symptoms {
            if !seen.insert(symptom) {
                return Err(KnowledgeError::RepeatedConditionSymptom {
                    condition: name,
                    symptom: symptom.to_string(),
                });
            }
        }

        if !(0.0..=1.0).contains(&base_confidence) {
            return Err(KnowledgeError::ConfidenceOutOfRange {
                condition: name,
                value: base_confidence,
            });
        }

        for (list, items) in [
            ("medications", &recommendations.medications),
            ("lifestyle", &recommendations.lifestyle),
            ("escalation", &recommendations.escalation_criteria),
        ] {
            if items.iter().all(|s| s.trim().is_empty()) {
                return Err(KnowledgeError::EmptyRecommendations {
                    condition: name,
                    list,
                });
            }
        }

        Ok(Self {
            name,
            symptoms,
            base_confidence,
            urgent,
            recommendations,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symptoms(&self) -> &[SymptomToken] {
        &self.symptoms
    }

    pub fn base_confidence(&self) -> f64 {
        self.base_confidence
    }

    /// Whether selecting this condition calls for immediate care.
    pub fn is_urgent(&self) -> bool {
        self.urgent
    }

    pub fn recommendations(&self) -> &Recommendations {
        &self.recommendations
    }
}

/// The keyword dictionary and condition table, validated together.
#[derive(Clone, Debug)]
pub struct KnowledgeBase {
    keywords: Vec<KeywordPattern>,
    conditions: Vec<ConditionPattern>,
}

// ============================================================================
// Wire model
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KnowledgeWire {
    symptoms: Vec<SymptomWire>,
    conditions: Vec<ConditionWire>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SymptomWire {
    token: SymptomToken,
    phrases: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConditionWire {
    name: String,
    symptoms: Vec<SymptomToken>,
    base_confidence: f64,
    #[serde(default)]
    urgent: bool,
    recommendations: Recommendations,
}

// ============================================================================
// Loading
// ============================================================================

impl KnowledgeBase {
    /// Assemble a knowledge base from already-built tables.
    ///
    /// # Errors
    ///
    /// Returns [`KnowledgeError`] if a symptom token or condition name is duplicated, or if a
    /// condition references a token that the dictionary does not define.
    pub fn new(
        keywords: Vec<KeywordPattern>,
        conditions: Vec<ConditionPattern>,
    ) -> Result<Self, KnowledgeError> {
        let mut tokens = HashSet::new();
        for keyword in &keywords {
            if !tokens.insert(keyword.token().clone()) {
                return Err(KnowledgeError::DuplicateSymptom(keyword.token().to_string()));
            }
        }

        let mut names = HashSet::new();
        for condition in &conditions {
            if !names.insert(condition.name().to_lowercase()) {
                return Err(KnowledgeError::DuplicateCondition(condition.name().into()));
            }
            if let Some(unknown) = condition.symptoms().iter().find(|s| !tokens.contains(*s)) {
                return Err(KnowledgeError::UnknownSymptom {
                    condition: condition.name().into(),
                    symptom: unknown.to_string(),
                });
            }
        }

        Ok(Self {
            keywords,
            conditions,
        })
    }

    /// The knowledge base compiled into the binary.
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::parse(DEFAULT_KNOWLEDGE_YAML)
    }

    /// Parse a knowledge base from YAML text.
    ///
    /// This uses `serde_path_to_error` so a schema mismatch reports where it happened
    /// (for example `conditions.3.base_confidence`).
    ///
    /// # Errors
    ///
    /// Returns [`KnowledgeError::Parse`] if the YAML does not match the schema (unknown keys
    /// included), or any validation error from [`KeywordPattern::new`],
    /// [`ConditionPattern::new`] and [`KnowledgeBase::new`].
    pub fn parse(yaml_text: &str) -> Result<Self, KnowledgeError> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        let wire = match serde_path_to_error::deserialize::<_, KnowledgeWire>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let path = if path.is_empty() || path == "." {
                    "<root>".to_string()
                } else {
                    path
                };
                return Err(KnowledgeError::Parse {
                    path,
                    message: err.into_inner().to_string(),
                });
            }
        };

        let keywords = wire
            .symptoms
            .into_iter()
            .map(|s| KeywordPattern::new(s.token, s.phrases))
            .collect::<Result<Vec<_>, _>>()?;

        let conditions = wire
            .conditions
            .into_iter()
            .map(|c| {
                ConditionPattern::new(
                    c.name,
                    c.symptoms,
                    c.base_confidence,
                    c.urgent,
                    c.recommendations,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(keywords, conditions)
    }

    /// Read and parse a knowledge file.
    pub fn from_file(path: &Path) -> Result<Self, KnowledgeError> {
        let text = std::fs::read_to_string(path).map_err(|source| KnowledgeError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Load the override file when one is configured, otherwise the built-in tables.
    pub fn load(override_file: Option<PathBuf>) -> Result<Self, KnowledgeError> {
        match override_file {
            Some(path) => {
                tracing::info!("loading knowledge base from {}", path.display());
                Self::from_file(&path)
            }
            None => Self::builtin(),
        }
    }

    pub fn keywords(&self) -> &[KeywordPattern] {
        &self.keywords
    }

    pub fn conditions(&self) -> &[ConditionPattern] {
        &self.conditions
    }

    pub fn condition(&self, name: &str) -> Option<&ConditionPattern> {
        self.conditions
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> SymptomToken {
        SymptomToken::new(s).expect("valid token")
    }

    fn advice() -> Recommendations {
        Recommendations {
            medications: vec!["rest".into()],
            lifestyle: vec!["fluids".into()],
            escalation_criteria: vec!["worsening".into()],
        }
    }

    #[test]
    fn builtin_knowledge_base_is_valid() {
        let kb = KnowledgeBase::builtin().expect("builtin knowledge parses");
        assert!(!kb.keywords().is_empty());
        assert!(!kb.conditions().is_empty());
        assert_eq!(kb.conditions()[0].name(), "Common Cold or Flu");

        let emergency = kb
            .condition("acute chest pain with breathing difficulty")
            .expect("emergency pattern present");
        assert!(emergency.is_urgent());
        assert_eq!(emergency.base_confidence(), 0.85);
    }

    #[test]
    fn phrases_are_lowercased() {
        let pattern =
            KeywordPattern::new(token("fever"), vec!["High Temperature".into()]).expect("valid");
        assert_eq!(pattern.phrases(), ["high temperature"]);
        assert!(pattern.matches_lowercase("i have a high temperature"));
    }

    #[test]
    fn rejects_symptom_without_phrases() {
        let err = KeywordPattern::new(token("fever"), vec![]).unwrap_err();
        assert!(matches!(err, KnowledgeError::EmptyPhrases(t) if t == "fever"));

        let err = KeywordPattern::new(token("fever"), vec!["  ".into()]).unwrap_err();
        assert!(matches!(err, KnowledgeError::BlankPhrase(_)));
    }

    #[test]
    fn rejects_confidence_outside_unit_interval() {
        let err = ConditionPattern::new("Odd", vec![token("fever")], 1.2, false, advice())
            .unwrap_err();
        assert!(matches!(err, KnowledgeError::ConfidenceOutOfRange { value, .. } if value == 1.2));
    }

    #[test]
    fn rejects_empty_recommendation_list() {
        let mut recs = advice();
        recs.lifestyle.clear();
        let err =
            ConditionPattern::new("Odd", vec![token("fever")], 0.5, false, recs).unwrap_err();
        assert!(matches!(
            err,
            KnowledgeError::EmptyRecommendations { list: "lifestyle", .. }
        ));
    }

    #[test]
    fn rejects_repeated_condition_symptom() {
        let err = ConditionPattern::new(
            "Odd",
            vec![token("fever"), token("fever")],
            0.5,
            false,
            advice(),
        )
        .unwrap_err();
        assert!(matches!(err, KnowledgeError::RepeatedConditionSymptom { .. }));
    }

    #[test]
    fn rejects_unknown_symptom_reference() {
        let keywords = vec![KeywordPattern::new(token("fever"), vec!["fever".into()]).unwrap()];
        let conditions = vec![ConditionPattern::new(
            "Flu",
            vec![token("fever"), token("cough")],
            0.7,
            false,
            advice(),
        )
        .unwrap()];

        let err = KnowledgeBase::new(keywords, conditions).unwrap_err();
        assert!(matches!(
            err,
            KnowledgeError::UnknownSymptom { symptom, .. } if symptom == "cough"
        ));
    }

    #[test]
    fn rejects_duplicate_condition_names_case_insensitively() {
        let keywords = vec![KeywordPattern::new(token("fever"), vec!["fever".into()]).unwrap()];
        let flu = |name: &str| {
            ConditionPattern::new(name, vec![token("fever")], 0.7, false, advice()).unwrap()
        };
        let err = KnowledgeBase::new(keywords, vec![flu("Flu"), flu("flu")]).unwrap_err();
        assert!(matches!(err, KnowledgeError::DuplicateCondition(_)));
    }

    #[test]
    fn strict_parsing_reports_path_of_unknown_key() {
        let yaml = r#"
symptoms:
  - token: fever
    phrases: [fever]
    weight: 2
conditions: []
"#;
        let err = KnowledgeBase::parse(yaml).expect_err("unknown key must fail");
        match err {
            KnowledgeError::Parse { path, message } => {
                assert!(path.starts_with("symptoms"), "path was {path}");
                assert!(message.contains("weight"));
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn parsing_rejects_invalid_token() {
        let yaml = r#"
symptoms:
  - token: Sore Throat
    phrases: [sore throat]
conditions: []
"#;
        let err = KnowledgeBase::parse(yaml).expect_err("invalid token must fail");
        assert!(matches!(err, KnowledgeError::Parse { .. }));
    }

    #[test]
    fn loads_override_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("kb.yaml");
        std::fs::write(
            &path,
            r#"
symptoms:
  - token: rash
    phrases: [rash]
  - token: itching
    phrases: [itch]
conditions:
  - name: Contact Dermatitis
    symptoms: [rash, itching]
    base_confidence: 0.7
    recommendations:
      medications: [emollient cream]
      lifestyle: [avoid irritants]
      escalation_criteria: [spreading rash]
"#,
        )
        .expect("write kb");

        let kb = KnowledgeBase::load(Some(path)).expect("override loads");
        assert_eq!(kb.conditions().len(), 1);
        assert!(!kb.conditions()[0].is_urgent());
    }

    #[test]
    fn missing_override_file_is_reported() {
        let err = KnowledgeBase::from_file(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, KnowledgeError::FileRead { .. }));
    }
}
