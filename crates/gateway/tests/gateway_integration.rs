//! Integration tests for the gateway server.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use gateway::config::Config;
use gateway::routes::health::AppState;
use health::{InMemoryChecker, Readiness, ServiceName};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup() -> axum::Router {
    let state = gateway::create_state(&Config::default());
    gateway::create_app(state, get_metrics_handle())
}

fn setup_with_readiness(readiness: Readiness) -> axum::Router {
    gateway::create_app(Arc::new(AppState { readiness }), get_metrics_handle())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], br#"{"status":"ok","service":"api-gateway"}"#);
}

#[tokio::test]
async fn test_health_ignores_headers_and_query() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health?verbose=true")
                .header("authorization", "Bearer nonsense")
                .body(Body::from("ignored"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({ "status": "ok", "service": "api-gateway" })
    );
}

#[tokio::test]
async fn test_health_unaffected_by_failing_dependencies() {
    let db = InMemoryChecker::new("db");
    db.set_healthy(false);
    let app = setup_with_readiness(
        Readiness::new(ServiceName::gateway()).with_checker(Arc::new(db.clone())),
    );

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
    assert_eq!(db.probe_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_health_checks() {
    let app = setup();

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                let response = app.oneshot(get("/health")).await.unwrap();
                assert_eq!(response.status(), StatusCode::OK);
                body_json(response).await
            })
        })
        .collect();

    let expected = serde_json::json!({ "status": "ok", "service": "api-gateway" });
    for handle in handles {
        assert_eq!(handle.await.unwrap(), expected);
    }
}

#[tokio::test]
async fn test_health_rejects_other_methods() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_ready_without_checkers() {
    let app = setup();

    let response = app.oneshot(get("/ready")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "api-gateway");
    assert_eq!(json["checks"].as_array().unwrap().len(), 0);
    assert!(json["checked_at"].as_str().is_some());
}

#[tokio::test]
async fn test_ready_degraded_when_optional_dependency_fails() {
    let db = InMemoryChecker::new("db");
    let search = InMemoryChecker::new("search");
    search.set_critical(false);
    search.set_healthy(false);

    let app = setup_with_readiness(
        Readiness::new(ServiceName::gateway())
            .with_checker(Arc::new(db))
            .with_checker(Arc::new(search)),
    );

    let response = app.oneshot(get("/ready")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"][0]["name"], "db");
    assert_eq!(json["checks"][0]["outcome"], "healthy");
    assert_eq!(json["checks"][1]["name"], "search");
    assert_eq!(json["checks"][1]["outcome"], "unhealthy");
}

#[tokio::test]
async fn test_ready_unavailable_when_critical_dependency_fails() {
    let db = InMemoryChecker::new("db");
    db.set_healthy(false);
    let app = setup_with_readiness(
        Readiness::new(ServiceName::gateway()).with_checker(Arc::new(db.clone())),
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/ready")
                .header("x-request-id", "lb-check-7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.headers()["x-request-id"], "lb-check-7");
    let json = body_json(response).await;
    assert_eq!(json["status"], "unavailable");
    assert_eq!(json["checks"][0]["detail"], "db marked unhealthy");

    db.set_healthy(true);
    let response = app.oneshot(get("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_ready_reports_timed_out_probe() {
    let stuck = InMemoryChecker::new("stuck");
    stuck.set_delay(Duration::from_secs(30));
    let app = setup_with_readiness(
        Readiness::new(ServiceName::gateway())
            .with_probe_timeout(Duration::from_millis(50))
            .with_checker(Arc::new(stuck)),
    );

    let response = app.oneshot(get("/ready")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["checks"][0]["outcome"], "timed_out");
    assert_eq!(json["checks"][0]["detail"], "probe timed out after 50ms");
}

#[tokio::test]
async fn test_ready_probes_configured_upstreams() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = Config::from_lookup(|key| match key {
        "UPSTREAMS" => Some(format!("users={addr}")),
        _ => None,
    })
    .unwrap();
    let app = gateway::create_app(gateway::create_state(&config), get_metrics_handle());

    let response = app.oneshot(get("/ready")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["checks"][0]["name"], "users");
    assert_eq!(json["checks"][0]["detail"], format!("connected to {addr}"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let flaky = InMemoryChecker::new("metrics-flaky");
    flaky.set_healthy(false);
    let app = setup_with_readiness(
        Readiness::new(ServiceName::gateway()).with_checker(Arc::new(flaky)),
    );

    let response = app.clone().oneshot(get("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        gateway::routes::metrics::PROMETHEUS_CONTENT_TYPE
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("health_probe_failures_total"));
    assert!(text.contains("metrics-flaky"));
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = setup();

    let response = app.oneshot(get("/v1/users")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let id = response.headers()["x-request-id"].to_str().unwrap();
    assert!(id.parse::<common::RequestId>().is_ok());
    let json = body_json(response).await;
    assert_eq!(json["error"], "no route for /v1/users");
}

#[tokio::test]
async fn test_request_id_generated() {
    let app = setup();

    let response = app.oneshot(get("/health")).await.unwrap();

    let id = response.headers()["x-request-id"].to_str().unwrap();
    assert!(id.parse::<common::RequestId>().is_ok());
}

#[tokio::test]
async fn test_request_id_propagated() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "trace-me-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-me-123");
}
