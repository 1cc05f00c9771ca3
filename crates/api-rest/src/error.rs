//! API errors and their HTTP mapping.

use api_shared::ErrorRes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medichain_core::constants::{MEDICAL_DISCLAIMER, REPHRASE_SUGGESTIONS};
use medichain_core::TriageError;

/// Message shown for any failure that is not the caller's fault.
pub const UNAVAILABLE_MESSAGE: &str =
    "The diagnosis system is temporarily unavailable. Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("symptoms are required")]
    MissingSymptoms,
    #[error("no recognizable symptoms")]
    NoRecognizableSymptoms { suggestions: Vec<String> },
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::MissingSymptoms => ApiError::MissingSymptoms,
            e if e.is_client_error() => ApiError::BadRequest(e.to_string()),
            e => ApiError::Internal(e.to_string()),
        }
    }
}

fn suggestions() -> Vec<String> {
    REPHRASE_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

impl ApiError {
    fn parts(self) -> (StatusCode, ErrorRes) {
        match self {
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                ErrorRes {
                    error: "BAD_REQUEST".into(),
                    message: detail,
                    suggestions: Vec::new(),
                    disclaimer: None,
                },
            ),
            ApiError::MissingSymptoms => (
                StatusCode::BAD_REQUEST,
                ErrorRes {
                    error: "SYMPTOMS_REQUIRED".into(),
                    message: "Please describe your symptoms.".into(),
                    suggestions: suggestions(),
                    disclaimer: Some(MEDICAL_DISCLAIMER.into()),
                },
            ),
            ApiError::NoRecognizableSymptoms { suggestions } => (
                StatusCode::BAD_REQUEST,
                ErrorRes {
                    error: "NO_RECOGNIZABLE_SYMPTOMS".into(),
                    message: "We could not recognise any symptoms. Please describe them more specifically."
                        .into(),
                    suggestions,
                    disclaimer: Some(MEDICAL_DISCLAIMER.into()),
                },
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "API internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, unavailable_body())
            }
        }
    }
}

/// Body used for 500 responses, including caught panics.
pub fn unavailable_body() -> ErrorRes {
    ErrorRes {
        error: "INTERNAL".into(),
        message: UNAVAILABLE_MESSAGE.into(),
        suggestions: Vec::new(),
        disclaimer: Some(MEDICAL_DISCLAIMER.into()),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();
        (status, Json(body)).into_response()
    }
}
