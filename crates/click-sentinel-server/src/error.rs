// click-sentinel-server/src/error.rs
// ============================================================================
// Module: Click Sentinel API Errors
// Description: API error type and HTTP status mapping.
// Purpose: Surface storage and validation failures as JSON error bodies.
// Dependencies: axum, click-sentinel-core, serde, thiserror
// ============================================================================

//! ## Overview
//! Every handler failure maps to a JSON body with a stable error message.
//! Not-found lookups are distinct from other failures (404), uniqueness
//! conflicts map to 409, invalid input to 400, and everything else fails as
//! a 500 without leaking internals beyond the error display string.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use click_sentinel_core::StoreError;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// API errors surfaced by the HTTP layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Uniqueness constraint rejected the request.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Request payload or parameters are invalid.
    #[error("invalid request: {0}")]
    Invalid(String),
    /// Storage collaborator failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(message) => Self::NotFound(message),
            StoreError::Conflict(message) => Self::Conflict(message),
            StoreError::Invalid(message) => Self::Invalid(message),
            StoreError::Io(message)
            | StoreError::Corrupt(message)
            | StoreError::VersionMismatch(message)
            | StoreError::Store(message) => Self::Storage(message),
        }
    }
}

/// JSON body returned for failed requests.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Human-readable error description.
    error: String,
}

impl ApiError {
    /// Returns the HTTP status code for the error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
