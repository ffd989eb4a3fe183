//! HTTP handlers.

pub mod health;
pub mod metrics;

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for paths without a route.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}
