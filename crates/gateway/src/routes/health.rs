//! Liveness and readiness endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use health::{HealthStatus, Readiness, ReadinessReport};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub readiness: Readiness,
}

/// GET /health — `{"status":"ok","service":"api-gateway"}`, always 200.
pub async fn check() -> Json<HealthStatus> {
    Json(health::check())
}

/// GET /ready — aggregated dependency readiness.
///
/// Responds 200 while the service is `ok` or `degraded`, 503 once a critical
/// dependency fails, and 500 if evaluation itself panics.
#[tracing::instrument(skip(state))]
pub async fn ready(State(state): State<Arc<AppState>>) -> Result<Json<ReadinessReport>, ApiError> {
    // A panicking checker fails this request only.
    let report = tokio::spawn(async move { state.readiness.evaluate().await })
        .await
        .map_err(|err| ApiError::Internal(format!("readiness evaluation failed: {err}")))?;
    metrics::counter!("gateway_readiness_checks_total", "status" => report.status.as_str())
        .increment(1);

    if report.is_serving() {
        Ok(Json(report))
    } else {
        Err(ApiError::NotReady(Box::new(report)))
    }
}
