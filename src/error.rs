//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.
//!
//! Note that an unknown customer ID is NOT an error: handlers short-circuit
//! that case with a fixed apology message inside a normal 200 fulfillment
//! envelope so the dialogue can continue.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Upstream Errors**: Transport failures talking to the model or maps APIs
/// - **Protocol Errors**: The model or maps API answered with a rejection
///   or a payload we cannot use
/// - **Request Errors**: The webhook payload is missing required session
///   parameters
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Outbound HTTP request failed at the transport level.
    ///
    /// Returns HTTP 502 Bad Gateway.
    #[error("Upstream request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The generative model endpoint rejected the request or returned a
    /// stream we could not parse.
    ///
    /// Returns HTTP 502 Bad Gateway.
    #[error("Generative model error: {0}")]
    Model(String),

    /// The distance matrix API reported a non-OK status for the request
    /// or for the requested origin/destination pair.
    ///
    /// Returns HTTP 502 Bad Gateway.
    #[error("Distance matrix error: {0}")]
    DistanceMatrix(String),

    /// A required session parameter is missing or has the wrong shape.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String names the offending parameter.
    #[error("Missing or invalid session parameter: {0}")]
    MissingParameter(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `MissingParameter` → 400 Bad Request
/// - `Http` / `Model` / `DistanceMatrix` → 502 Bad Gateway (hides upstream detail)
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::MissingParameter(_) => (
                StatusCode::BAD_REQUEST,
                "missing_parameter",
                self.to_string(),
            ),
            AppError::Http(_) => (
                StatusCode::BAD_GATEWAY,
                "upstream_error",
                "An upstream request failed".to_string(),
            ),
            AppError::Model(_) => (
                StatusCode::BAD_GATEWAY,
                "model_error",
                "The generative model request failed".to_string(),
            ),
            AppError::DistanceMatrix(_) => (
                StatusCode::BAD_GATEWAY,
                "distance_matrix_error",
                "The distance lookup failed".to_string(),
            ),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}
