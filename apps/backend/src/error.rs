//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::extraction::ExtractError;
use crate::services::llm::ProviderError;
use crate::services::sync::SyncError;
use crate::store::StoreError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Validation(msg) => Self::Validation(msg),
            SyncError::Store(err) => Self::Store(err),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Extract(ExtractError::EmptyInput) => {
                (StatusCode::BAD_REQUEST, "empty_input")
            }
            ApiError::Extract(ExtractError::UnsupportedFormat) => {
                (StatusCode::BAD_REQUEST, "unsupported_format")
            }
            ApiError::Extract(ExtractError::CorruptInput(_)) => {
                (StatusCode::BAD_REQUEST, "corrupt_input")
            }
            ApiError::Extract(ExtractError::DependencyUnavailable(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, "dependency_unavailable")
            }
            ApiError::Provider(ProviderError::RateLimited(_)) => {
                (StatusCode::TOO_MANY_REQUESTS, "rate_limited")
            }
            ApiError::Provider(ProviderError::Upstream(_)) => {
                (StatusCode::BAD_GATEWAY, "provider_upstream")
            }
            ApiError::Provider(ProviderError::Timeout(_)) => {
                (StatusCode::GATEWAY_TIMEOUT, "provider_timeout")
            }
            ApiError::Provider(ProviderError::Unknown(_)) => {
                (StatusCode::BAD_GATEWAY, "provider_error")
            }
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        // Dependency and timeout failures carry internal detail that must
        // not cross the API boundary; log it and send a remediation message.
        let message = match &self {
            ApiError::Extract(ExtractError::DependencyUnavailable(detail)) => {
                tracing::error!(detail = %detail, "extraction dependency unavailable");
                "A required processing dependency is unavailable. Please contact support."
                    .to_string()
            }
            ApiError::Provider(ProviderError::Timeout(detail)) => {
                tracing::error!(detail = %detail, "provider request timed out");
                "The flashcard generator timed out. Please try again later.".to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
