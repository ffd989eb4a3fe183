//! API error types with HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use health::ReadinessReport;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// No route matched the request.
    NotFound(String),
    /// A critical dependency failed its readiness probe.
    NotReady(Box<ReadinessReport>),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => {
                let body = serde_json::json!({ "error": msg });
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            ApiError::NotReady(report) => {
                let failing: Vec<String> = report
                    .checks
                    .iter()
                    .filter(|c| c.critical && !c.outcome.is_healthy())
                    .map(|c| c.name.clone())
                    .collect();
                tracing::warn!(?failing, "reporting not ready");
                (StatusCode::SERVICE_UNAVAILABLE, Json(*report)).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                let body = serde_json::json!({ "error": msg });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
