//! Error types for pcv-qs
//!
//! Every failure answers with `{"success": false, "message": ...}`. Server-side
//! failures (500) answer with a generic message; their detail, including
//! filesystem paths, goes to the log only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pcv_common::api::ApiFailure;
use thiserror::Error;

use crate::store::StoreError;
use crate::validation::ValidationError;

/// Message returned for every 500 response
pub const GENERIC_SERVER_ERROR: &str =
    "A server error occurred. Contact the server administrator for details.";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Payload rejected (400)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Method other than POST/OPTIONS on the writer endpoint (405)
    #[error("Only the POST method is allowed")]
    MethodNotAllowed,

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Queue Store failure: path safety, I/O or lock (500)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            GENERIC_SERVER_ERROR.to_string()
        } else {
            self.to_string()
        };

        (status, Json(ApiFailure::new(message))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
