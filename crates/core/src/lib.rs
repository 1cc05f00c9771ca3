//! # MediChain Core
//!
//! Symptom-triage engine for the MediChain telehealth platform.
//!
//! This crate contains pure, in-memory logic:
//! - Keyword dictionary and condition table loading (`knowledge`)
//! - Symptom extraction from free text (`extractor`)
//! - Condition scoring with a minimum-match gate (`matcher`)
//! - Confidence blending and bucketing (`confidence`)
//! - Result assembly with fallback handling (`assembler`, `engine`)
//!
//! **No API concerns**: HTTP servers, request ids and JSON wire types belong in `api-rest`
//! and `api-shared`.

pub mod assembler;
pub mod confidence;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod knowledge;
pub mod matcher;
pub mod validation;

pub use assembler::{Alternative, DiagnosisResult};
pub use confidence::ConfidenceLevel;
pub use config::EngineConfig;
pub use engine::{TriageEngine, TriageOutcome};
pub use error::{KnowledgeError, TriageError, TriageResult};
pub use extractor::DetectedSymptoms;
pub use knowledge::{ConditionPattern, KeywordPattern, KnowledgeBase, Recommendations};
pub use validation::TriageRequest;

pub use triage_types::SymptomToken;
