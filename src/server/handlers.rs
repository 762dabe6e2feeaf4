//! HTTP request handlers.

use super::AppState;
use crate::gateway::MAX_CONTENT_CHARS;
use crate::types::ClassificationResult;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest batch accepted by `/classify/batch`.
pub const MAX_BATCH_ITEMS: usize = 50;

const LOG_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub content: String,
    /// Source platform (twitter, youtube, ...)
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchClassifyRequest {
    pub items: Vec<ClassifyRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchClassifyResponse {
    pub results: Vec<ClassificationResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub ollama_connected: bool,
    pub model: String,
}

/// Request rejected before it reaches the classifier.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn unprocessable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }
}

/// Unreadable bodies answer with the same `{detail}` shape as validation.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::unprocessable(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/classify", post(classify_content))
        .route("/classify/batch", post(classify_batch))
        .route("/intents", get(get_intents))
}

fn validate_content(content: &str, field: &str) -> Result<(), ApiError> {
    if content.is_empty() {
        return Err(ApiError::unprocessable(format!("{}: content must not be empty", field)));
    }
    let len = content.chars().count();
    if len > MAX_CONTENT_CHARS {
        return Err(ApiError::unprocessable(format!(
            "{}: content is {} characters, maximum is {}",
            field, len, MAX_CONTENT_CHARS
        )));
    }
    Ok(())
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = state.classifier.check_health().await;
    Json(HealthResponse {
        status: if connected { "ok" } else { "degraded" }.to_string(),
        ollama_connected: connected,
        model: state.classifier.model().to_string(),
    })
}

async fn classify_content(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassificationResult>, ApiError> {
    let Json(request) = payload?;
    validate_content(&request.content, "content")?;

    let request_id = Uuid::new_v4();
    let result = state.classifier.classify(&request.content).await;
    tracing::debug!(
        request_id = %request_id,
        source = request.source.as_deref().unwrap_or("unknown"),
        preview = %request.content.chars().take(LOG_PREVIEW_CHARS).collect::<String>(),
        intent = %result.intent,
        confidence = result.confidence,
        "classified content"
    );
    Ok(Json(result))
}

async fn classify_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchClassifyRequest>, JsonRejection>,
) -> Result<Json<BatchClassifyResponse>, ApiError> {
    let Json(request) = payload?;
    if request.items.len() > MAX_BATCH_ITEMS {
        return Err(ApiError::unprocessable(format!(
            "items: at most {} items per batch, got {}",
            MAX_BATCH_ITEMS,
            request.items.len()
        )));
    }
    for (i, item) in request.items.iter().enumerate() {
        validate_content(&item.content, &format!("items[{}].content", i))?;
    }

    let request_id = Uuid::new_v4();
    let contents: Vec<&str> = request.items.iter().map(|i| i.content.as_str()).collect();
    let results = state.classifier.classify_batch(&contents).await;
    tracing::debug!(
        request_id = %request_id,
        items = results.len(),
        "classified batch"
    );
    Ok(Json(BatchClassifyResponse { results }))
}

async fn get_intents(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.classifier.intents().to_document())
}
