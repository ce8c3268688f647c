//! Deficiencia service error types.
//!
//! All errors map to HTTP status codes via the `IntoResponse` impl and render
//! as `{"error": "<message>"}`. Database failures are logged server-side and
//! surface to clients with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Deficiencia service error type.
///
/// Maps to HTTP status codes:
/// - Database, Internal: 500 Internal Server Error
/// - NotFound: 404 Not Found
/// - BadRequest: 400 Bad Request
#[derive(Debug, Error)]
pub enum DsError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal,
}

impl DsError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            DsError::Database(_) | DsError::Internal => 500,
            DsError::NotFound(_) => 404,
            DsError::BadRequest(_) => 400,
        }
    }
}

/// JSON body for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for DsError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            DsError::Database(err) => {
                tracing::error!(target: "ds.database", error = %err, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            DsError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            DsError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            DsError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            ),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
