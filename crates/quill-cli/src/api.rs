use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use quill_core::{DetectReport, Label, QuillError};
use quill_detect::Detector;
use quill_db::QuillDb;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::info;

/// How many stored documents the similarity enrichment compares against.
const SIMILARITY_CORPUS_LIMIT: usize = 200;

pub struct ApiState {
    pub detector: Detector,
    pub db: Option<QuillDb>,
}

pub fn api_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/detect", post(detect_handler))
        .route("/api/analyses", get(analyses_handler))
        .route("/api/corpus", post(add_document_handler))
        .route("/api/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_request(message: String) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
}

fn internal_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "internal error" })),
    )
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "quill-api"
    }))
}

#[derive(Deserialize)]
struct DetectBody {
    text: Option<String>,
}

async fn detect_handler(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<DetectBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let text = match body.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(bad_request("No text provided".to_string())),
    };

    let result = state.detector.detect(&text).map_err(|e| match e {
        QuillError::InvalidInput(msg) => bad_request(msg),
        _ => internal_error(),
    })?;

    let report = DetectReport::from(&result);
    let mut payload = serde_json::to_value(&report).map_err(|_| internal_error())?;

    if let Some(db) = &state.db {
        if let Ok(docs) = db.get_documents(SIMILARITY_CORPUS_LIMIT) {
            if !docs.is_empty() {
                let similarity = state.detector.corpus_similarity(&text, &docs);
                payload["similarity"] =
                    serde_json::to_value(similarity).map_err(|_| internal_error())?;
            }
        }
        if let Err(e) = db.insert_analysis(&result) {
            info!(error = %e, "failed to persist analysis");
        }
    }

    info!(
        score = result.score,
        max_score = result.max_score,
        label = result.label.as_str(),
        "detection served"
    );
    Ok(Json(payload))
}

#[derive(Deserialize)]
struct PaginationParams {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    100
}

async fn analyses_handler(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = state
        .db
        .as_ref()
        .ok_or_else(|| bad_request("no database configured".to_string()))?;
    let analyses = db.get_analyses(params.limit).map_err(|_| internal_error())?;
    Ok(Json(serde_json::to_value(&analyses).unwrap_or_default()))
}

#[derive(Deserialize)]
struct AddDocumentBody {
    text: String,
    label: Label,
    #[serde(default = "default_source")]
    source: String,
}

fn default_source() -> String {
    "api".to_string()
}

async fn add_document_handler(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<AddDocumentBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = state
        .db
        .as_ref()
        .ok_or_else(|| bad_request("no database configured".to_string()))?;
    if body.text.trim().is_empty() {
        return Err(bad_request("No text provided".to_string()));
    }
    let id = db
        .insert_document(&body.text, body.label, &body.source)
        .map_err(|_| internal_error())?;
    info!(id = %id, label = body.label.as_str(), "reference document added");
    Ok(Json(serde_json::json!({
        "status": "ok",
        "id": id,
        "label": body.label.as_str(),
    })))
}

async fn stats_handler(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let db = state
        .db
        .as_ref()
        .ok_or_else(|| bad_request("no database configured".to_string()))?;
    let stats = db.stats().map_err(|_| internal_error())?;
    Ok(Json(serde_json::to_value(&stats).unwrap_or_default()))
}
