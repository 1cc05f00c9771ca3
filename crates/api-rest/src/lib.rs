//! # API REST
//!
//! REST API implementation for MediChain triage.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON rejection mapping, CORS, panic containment)
//!
//! Uses `api-shared` for wire types and `medichain-core` for the triage engine.

#![warn(rust_2018_idioms)]

pub mod error;

use std::any::Any;

use api_shared::{
    ConditionSummary, DiagnoseReq, DiagnoseRes, ErrorRes, HealthRes, HealthService,
    ListConditionsRes, ListSymptomsRes, PatientContext, RecommendationsRes, SymptomSummary,
    TopPrediction,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use medichain_core::{TriageEngine, TriageOutcome};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Application state shared across REST API handlers.
///
/// The engine wraps its knowledge base in an `Arc`, so cloning per request is cheap.
#[derive(Clone)]
pub struct AppState {
    engine: TriageEngine,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, diagnose, list_conditions, list_symptoms),
    components(schemas(
        HealthRes,
        DiagnoseReq,
        DiagnoseRes,
        RecommendationsRes,
        TopPrediction,
        PatientContext,
        ErrorRes,
        ConditionSummary,
        ListConditionsRes,
        SymptomSummary,
        ListSymptomsRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router around a ready triage engine.
///
/// Routes:
/// - `GET /health`
/// - `POST /diagnose`
/// - `GET /conditions`
/// - `GET /symptoms`
/// - Swagger UI at `/swagger-ui`, OpenAPI JSON at `/api-docs/openapi.json`
pub fn router(engine: TriageEngine) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/diagnose", post(diagnose))
        .route("/conditions", get(list_conditions))
        .route("/symptoms", get(list_symptoms))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .with_state(AppState { engine })
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail, "request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(error::unavailable_body()),
    )
        .into_response()
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/diagnose",
    request_body = DiagnoseReq,
    responses(
        (status = 200, description = "Diagnosis produced", body = DiagnoseRes),
        (status = 400, description = "Missing symptoms, invalid fields or no recognizable symptoms", body = ErrorRes),
        (status = 500, description = "System temporarily unavailable", body = ErrorRes)
    )
)]
/// Run symptom triage over free text
///
/// Extracts symptoms, scores every condition pattern and returns the best match with
/// ranked alternatives. When symptoms are recognised but no condition matches strongly
/// enough, a generic "Unspecified Condition" is returned with `fallback = true`.
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the body is not valid JSON for `DiagnoseReq`,
/// - `symptoms` is missing or blank, or `age`/`gender` are invalid,
/// - no symptom could be recognised (the body carries rephrasing suggestions).
#[axum::debug_handler]
async fn diagnose(
    State(state): State<AppState>,
    payload: Result<Json<DiagnoseReq>, JsonRejection>,
) -> Result<Json<DiagnoseRes>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected malformed diagnose body");
        ApiError::BadRequest(rejection.body_text())
    })?;

    let request = req.into_request().map_err(|e| {
        tracing::debug!(error = %e, "rejected diagnose request");
        ApiError::from(e)
    })?;

    match state.engine.triage(&request) {
        TriageOutcome::Diagnosed(result) => {
            tracing::info!(
                condition = %result.primary_condition,
                level = %result.confidence_level,
                fallback = result.fallback,
                "diagnosis produced"
            );
            Ok(Json(DiagnoseRes::from_result(&result, Some(&request))))
        }
        TriageOutcome::NoRecognizableSymptoms { suggestions } => {
            Err(ApiError::NoRecognizableSymptoms { suggestions })
        }
    }
}

#[utoipa::path(
    get,
    path = "/conditions",
    responses(
        (status = 200, description = "Condition patterns in evaluation order", body = ListConditionsRes)
    )
)]
/// List the condition table in evaluation order
#[axum::debug_handler]
async fn list_conditions(State(state): State<AppState>) -> Json<ListConditionsRes> {
    Json(ListConditionsRes::from_knowledge(state.engine.knowledge()))
}

#[utoipa::path(
    get,
    path = "/symptoms",
    responses(
        (status = 200, description = "Keyword dictionary", body = ListSymptomsRes)
    )
)]
#[axum::debug_handler]
async fn list_symptoms(State(state): State<AppState>) -> Json<ListSymptomsRes> {
    Json(ListSymptomsRes::from_knowledge(state.engine.knowledge()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use medichain_core::{EngineConfig, KnowledgeBase};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        router(TriageEngine::new(
            Arc::new(KnowledgeBase::builtin().unwrap()),
            EngineConfig::default(),
        ))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn diagnose_returns_primary_and_predictions() {
        let response = app()
            .oneshot(post_json(
                "/diagnose",
                r#"{"symptoms": "I have a fever, cough, and feel fatigued", "age": "34", "gender": "male"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["primary_diagnosis"], "Common Cold or Flu");
        assert_eq!(json["confidence"], 0.78);
        assert_eq!(json["confidence_level"], "Moderate");
        assert_eq!(
            json["detected_symptoms"],
            serde_json::json!(["cough", "fatigue", "fever"])
        );
        assert_eq!(json["top_predictions"][0]["diagnosis"], "Common Cold or Flu");
        assert_eq!(json["patient"]["age"], 34);
        assert!(json["disclaimer"].as_str().unwrap().contains("not a substitute"));
        assert!(!json["recommendations"]["medications"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn urgent_pattern_is_flagged() {
        let response = app()
            .oneshot(post_json(
                "/diagnose",
                r#"{"symptoms": "chest pain and shortness of breath"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["confidence_level"], "High");
        assert_eq!(json["urgent"], true);
        let escalation = json["recommendations"]["when_to_see_doctor"]
            .as_array()
            .unwrap();
        assert!(escalation
            .iter()
            .any(|e| e.as_str().unwrap().contains("SEEK IMMEDIATE CARE")));
    }

    #[tokio::test]
    async fn unrecognised_text_is_a_client_error_with_suggestions() {
        let response = app()
            .oneshot(post_json("/diagnose", r#"{"symptoms": "I feel a bit off"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = json_body(response).await;
        assert_eq!(json["error"], "NO_RECOGNIZABLE_SYMPTOMS");
        assert!(!json["suggestions"].as_array().unwrap().is_empty());
        assert!(json.get("primary_diagnosis").is_none());
    }

    #[tokio::test]
    async fn missing_or_blank_symptoms_are_rejected() {
        for body in [r#"{}"#, r#"{"symptoms": "   "}"#] {
            let response = app().oneshot(post_json("/diagnose", body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let json = json_body(response).await;
            assert_eq!(json["error"], "SYMPTOMS_REQUIRED");
            assert!(!json["suggestions"].as_array().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let response = app()
            .oneshot(post_json("/diagnose", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn invalid_age_is_rejected() {
        let response = app()
            .oneshot(post_json(
                "/diagnose",
                r#"{"symptoms": "fever and cough", "age": "two hundred"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn single_symptom_returns_fallback() {
        let response = app()
            .oneshot(post_json("/diagnose", r#"{"symptoms": "headache"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["primary_diagnosis"], "Unspecified Condition");
        assert_eq!(json["confidence"], 0.42);
        assert_eq!(json["fallback"], true);
    }

    #[tokio::test]
    async fn lists_knowledge_tables() {
        let response = app().oneshot(get("/conditions")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["conditions"][0]["name"], "Common Cold or Flu");

        let response = app().oneshot(get("/symptoms")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["symptoms"][0]["token"], "fever");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = app().oneshot(get("/api-docs/openapi.json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert!(json["paths"].get("/diagnose").is_some());
    }
}
