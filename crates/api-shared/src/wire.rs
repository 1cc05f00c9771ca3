//! JSON wire models for the triage API.
//!
//! Responsibilities:
//! - Define the request/response bodies exchanged over HTTP
//! - Provide translation helpers from core results into wire responses
//!
//! Notes:
//! - Field names are part of the public contract; `when_to_see_doctor` and
//!   `top_predictions` are kept for compatibility with existing clients

use chrono::Utc;
use medichain_core::{DiagnosisResult, KnowledgeBase, TriageError, TriageRequest};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Diagnosis request body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiagnoseReq {
    /// Free-text description of the symptoms.
    #[serde(default)]
    pub symptoms: Option<String>,
    /// Age in whole years, as a string.
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl DiagnoseReq {
    /// Validate into a core request.
    pub fn into_request(self) -> Result<TriageRequest, TriageError> {
        TriageRequest::new(self.symptoms, self.age, self.gender)
    }
}

/// Advice grouped the way clients display it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecommendationsRes {
    pub medications: Vec<String>,
    pub lifestyle: Vec<String>,
    pub when_to_see_doctor: Vec<String>,
}

/// One ranked candidate condition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopPrediction {
    pub diagnosis: String,
    /// Adjusted confidence for this condition.
    pub confidence: f64,
    /// Fraction of the condition's symptoms that were detected.
    pub probability: f64,
}

/// Caller-supplied context echoed back with the diagnosis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientContext {
    pub age: Option<u8>,
    pub gender: Option<String>,
}

/// Successful diagnosis response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiagnoseRes {
    pub request_id: String,
    pub generated_at: String,
    pub primary_diagnosis: String,
    pub confidence: f64,
    /// One of "High", "Moderate" or "Low".
    pub confidence_level: String,
    pub match_score: f64,
    pub detected_symptoms: Vec<String>,
    pub recommendations: RecommendationsRes,
    pub top_predictions: Vec<TopPrediction>,
    /// The primary diagnosis calls for immediate care.
    pub urgent: bool,
    /// No condition matched strongly enough; the primary diagnosis is generic.
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub patient: Option<PatientContext>,
    pub disclaimer: String,
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

impl DiagnoseRes {
    /// Translate a core result, stamping a fresh request id and timestamp.
    pub fn from_result(result: &DiagnosisResult, request: Option<&TriageRequest>) -> Self {
        let mut top_predictions = Vec::with_capacity(result.alternatives.len() + 1);
        top_predictions.push(TopPrediction {
            diagnosis: result.primary_condition.clone(),
            confidence: round4(result.final_confidence),
            probability: round4(result.match_score),
        });
        top_predictions.extend(result.alternatives.iter().map(|alt| TopPrediction {
            diagnosis: alt.condition.clone(),
            confidence: round4(alt.confidence),
            probability: round4(alt.match_score),
        }));

        let patient = request
            .filter(|r| r.age().is_some() || r.gender().is_some())
            .map(|r| PatientContext {
                age: r.age(),
                gender: r.gender().map(str::to_string),
            });

        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now().to_rfc3339(),
            primary_diagnosis: result.primary_condition.clone(),
            confidence: round4(result.final_confidence),
            confidence_level: result.confidence_level.to_string(),
            match_score: round4(result.match_score),
            detected_symptoms: result
                .detected_symptoms
                .iter()
                .map(|t| t.to_string())
                .collect(),
            recommendations: RecommendationsRes {
                medications: result.recommendations.medications.clone(),
                lifestyle: result.recommendations.lifestyle.clone(),
                when_to_see_doctor: result.recommendations.escalation_criteria.clone(),
            },
            top_predictions,
            urgent: result.urgent,
            fallback: result.fallback,
            patient,
            disclaimer: result.disclaimer.to_string(),
        }
    }
}

/// Error body for 4xx/5xx responses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    /// Machine-readable error code.
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
}

/// Summary of one condition pattern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConditionSummary {
    pub name: String,
    pub symptoms: Vec<String>,
    pub base_confidence: f64,
    pub urgent: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListConditionsRes {
    pub conditions: Vec<ConditionSummary>,
}

/// One dictionary entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SymptomSummary {
    pub token: String,
    pub phrases: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListSymptomsRes {
    pub symptoms: Vec<SymptomSummary>,
}

impl ListConditionsRes {
    pub fn from_knowledge(kb: &KnowledgeBase) -> Self {
        Self {
            conditions: kb
                .conditions()
                .iter()
                .map(|c| ConditionSummary {
                    name: c.name().to_string(),
                    symptoms: c.symptoms().iter().map(|s| s.to_string()).collect(),
                    base_confidence: c.base_confidence(),
                    urgent: c.is_urgent(),
                })
                .collect(),
        }
    }
}

impl ListSymptomsRes {
    pub fn from_knowledge(kb: &KnowledgeBase) -> Self {
        Self {
            symptoms: kb
                .keywords()
                .iter()
                .map(|k| SymptomSummary {
                    token: k.token().to_string(),
                    phrases: k.phrases().to_vec(),
                })
                .collect(),
        }
    }
}
