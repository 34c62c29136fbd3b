//! Error types for spam-api

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use spam_core::SpamError;
use thiserror::Error;
use tracing::{error, warn};

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client sent an unusable request
    #[error("{0}")]
    Validation(String),

    /// Lazy training could not produce models
    #[error("Failed to train models: {0}")]
    TrainingFailure(String),

    /// Training is still running after the wait budget
    #[error("Models are still training after {0}s, retry later")]
    TrainingTimeout(u64),

    /// Unexpected failure while serving a request
    #[error("Error during prediction: {0}")]
    Internal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::TrainingTimeout(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::TrainingFailure(_)
            | ApiError::Internal(_)
            | ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SpamError> for ApiError {
    fn from(err: SpamError) -> Self {
        match err {
            SpamError::EmptyText | SpamError::InvalidModel(_) => {
                ApiError::Validation(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();

        if status.is_server_error() {
            error!("{} {}", status, detail);
        } else {
            warn!("{} {}", status, detail);
        }

        (status, Json(ErrorBody { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::TrainingFailure("no data".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::TrainingTimeout(120).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_spam_errors_map_to_validation() {
        assert!(matches!(
            ApiError::from(SpamError::EmptyText),
            ApiError::Validation(ref m) if m == "Text cannot be empty"
        ));
        assert!(matches!(
            ApiError::from(SpamError::InvalidModel("svm".into())),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from(SpamError::NotFitted("K-Means")),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_timeout_message_asks_for_retry() {
        let msg = ApiError::TrainingTimeout(30).to_string();
        assert!(msg.contains("retry later"));
        assert!(msg.contains("30s"));
    }
}
