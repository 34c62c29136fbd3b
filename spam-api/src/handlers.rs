//! API request handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use spam_core::{ModelKind, SpamError};
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, Result};
use crate::registry::ModelRegistry;

/// Shared application state
pub struct AppState {
    pub registry: ModelRegistry,
}

/// Detect request body
#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub text: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    ModelKind::default().as_str().to_string()
}

/// Detect response
#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub is_spam: bool,
    pub confidence: f64,
    pub model_used: String,
    pub message: String,
}

/// Liveness response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
    pub status: String,
}

/// Ping response
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: String,
    pub message: String,
}

/// Which pipeline stages are trained
#[derive(Debug, Serialize)]
pub struct ModelsLoaded {
    pub tfidf: bool,
    pub logistic_regression: bool,
    pub naive_bayes: bool,
    pub kmeans: bool,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub models_loaded: ModelsLoaded,
}

/// Selectable model entry
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub description: String,
}

/// Model list response
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub available_models: Vec<ModelInfo>,
}

/// GET / - Liveness
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Spam Detection API is running!".to_string(),
        status: "healthy".to_string(),
    })
}

/// GET /health - Training status of every pipeline stage
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    // all stages are trained together
    let loaded = state.registry.is_loaded();
    Json(HealthResponse {
        status: "healthy".to_string(),
        models_loaded: ModelsLoaded {
            tfidf: loaded,
            logistic_regression: loaded,
            naive_bayes: loaded,
            kmeans: loaded,
        },
    })
}

/// GET /ping - Answers without touching the models
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "pong".to_string(),
        message: "API is running".to_string(),
    })
}

/// GET /models - Selectable models
pub async fn models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        available_models: ModelKind::ALL
            .iter()
            .map(|kind| ModelInfo {
                name: kind.as_str().to_string(),
                description: kind.description().to_string(),
            })
            .collect(),
    })
}

/// POST /detect - Classify a message
///
/// The request is validated before the models are touched, so a bad request
/// never triggers training.
pub async fn detect(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<DetectRequest>, JsonRejection>,
) -> Result<Json<DetectResponse>> {
    let Json(req) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;

    if req.text.trim().is_empty() {
        return Err(SpamError::EmptyText.into());
    }
    let kind: ModelKind = req.model.parse()?;

    let detector = state.registry.detector().await?;
    let result = detector.detect(&req.text, kind)?;

    info!(
        "Detected {} with {} (confidence {:.3})",
        if result.is_spam { "spam" } else { "legitimate" },
        kind,
        result.confidence
    );

    Ok(Json(DetectResponse {
        is_spam: result.is_spam,
        confidence: result.confidence,
        model_used: result.model_used.display_name().to_string(),
        message: result.message,
    }))
}
