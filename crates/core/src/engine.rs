//! The triage pipeline: extract, match, adjust, assemble.
//!
//! `TriageEngine` holds the read-only knowledge base behind an `Arc` and a copy of the
//! scoring configuration. It is cheap to clone and safe to share across request tasks.

use crate::assembler::{assemble, DiagnosisResult, Primary};
use crate::config::EngineConfig;
use crate::constants::REPHRASE_SUGGESTIONS;
use crate::extractor::extract;
use crate::knowledge::KnowledgeBase;
use crate::matcher::match_conditions;
use crate::validation::TriageRequest;
use std::sync::Arc;

/// Result of running the pipeline on one piece of text.
#[derive(Clone, Debug, PartialEq)]
pub enum TriageOutcome {
    Diagnosed(DiagnosisResult),
    /// Nothing in the text matched the dictionary; the caller should ask the user to rephrase.
    NoRecognizableSymptoms { suggestions: Vec<String> },
}

#[derive(Clone, Debug)]
pub struct TriageEngine {
    knowledge: Arc<KnowledgeBase>,
    config: EngineConfig,
}

impl TriageEngine {
    pub fn new(knowledge: Arc<KnowledgeBase>, config: EngineConfig) -> Self {
        tracing::info!(
            symptoms = knowledge.keywords().len(),
            conditions = knowledge.conditions().len(),
            min_matches = config.min_matches(),
            "triage engine ready"
        );
        Self { knowledge, config }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline over free text.
    ///
    /// Never fails for any string input: unrecognised text yields
    /// [`TriageOutcome::NoRecognizableSymptoms`] and sub-threshold matches yield the
    /// "Unspecified Condition" fallback.
    pub fn diagnose(&self, text: &str) -> TriageOutcome {
        let detected = extract(&self.knowledge, text);
        if detected.is_empty() {
            tracing::debug!("no recognizable symptoms in input");
            return TriageOutcome::NoRecognizableSymptoms {
                suggestions: REPHRASE_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            };
        }

        let outcome = match_conditions(&self.knowledge, &detected, &self.config);
        tracing::debug!(
            detected = ?detected.iter().map(|t| t.as_str()).collect::<Vec<_>>(),
            best = ?outcome.best.as_ref().map(|b| b.condition.name()),
            score = ?outcome.best.as_ref().map(|b| b.score),
            "matched symptoms"
        );

        let primary = match outcome.best {
            Some(best) => Primary::Matched(best),
            None => Primary::Unspecified,
        };
        let result = assemble(primary, detected, &outcome.alternatives, &self.config);

        if result.urgent {
            tracing::warn!(
                condition = %result.primary_condition,
                "urgent condition matched; immediate care advised"
            );
        }

        TriageOutcome::Diagnosed(result)
    }

    /// Run the pipeline for a validated request.
    pub fn triage(&self, request: &TriageRequest) -> TriageOutcome {
        self.diagnose(request.symptoms())
    }
}
