//! HTTP server for the api-gateway health surface.
//!
//! Exposes liveness (`/health`), dependency readiness (`/ready`) and
//! Prometheus metrics (`/metrics`), with request-ID propagation and
//! structured request logging (tracing).

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, Method};
use axum::routing::get;
use health::{Checker, Readiness, ServiceName, TcpChecker};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use middleware::{MakeGatewayRequestId, REQUEST_ID_HEADER};
use routes::health::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/ready", get(routes::health::ready))
        .with_state(state)
        .merge(metrics_router)
        .fallback(routes::not_found)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET])
                .allow_headers(Any),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    request_id.clone(),
                    MakeGatewayRequestId,
                ))
                .layer(TraceLayer::new_for_http().make_span_with(middleware::make_span))
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
}

/// Builds application state from configuration, registering a TCP checker
/// per configured upstream.
pub fn create_state(config: &Config) -> Arc<AppState> {
    let readiness = config.upstreams.iter().cloned().fold(
        Readiness::new(ServiceName::gateway()).with_probe_timeout(config.probe_timeout),
        |readiness, upstream| {
            tracing::info!(
                upstream = %upstream.name,
                addr = %upstream.addr,
                critical = upstream.critical,
                "registering readiness check"
            );
            readiness.with_checker(Arc::new(TcpChecker::new(upstream)) as Arc<dyn Checker>)
        },
    );

    Arc::new(AppState { readiness })
}
