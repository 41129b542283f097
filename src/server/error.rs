//! API error taxonomy and HTTP status mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;
use crate::upstream::UpstreamError;

/// Errors a route handler can surface to the client
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing required input
    #[error("{0}")]
    Validation(String),

    /// The requested recipe does not exist
    #[error("recipe not found")]
    NotFound,

    /// The upstream recipe API call failed
    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    /// Local storage failed; detail stays in the logs
    #[error("internal storage error")]
    Storage,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(message) => ApiError::Validation(message),
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Io(err) => {
                error!(error = %err, "recipe store I/O failure");
                ApiError::Storage
            }
            StoreError::Corrupt(err) => {
                error!(error = %err, "recipe store file is corrupt");
                ApiError::Storage
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
