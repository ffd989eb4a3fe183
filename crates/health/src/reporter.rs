//! Liveness reporting.

use common::ServiceName;

use crate::status::HealthStatus;

/// Answers a liveness query for the api-gateway.
///
/// Always returns `{ status: "ok", service: "api-gateway" }`. Performs no I/O
/// and holds no state, so it can be called from any number of tasks at once.
pub fn check() -> HealthStatus {
    HealthStatus::ok(ServiceName::gateway())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;

    fn expected() -> HealthStatus {
        HealthStatus {
            status: Status::Ok,
            service: ServiceName::from("api-gateway"),
        }
    }

    #[test]
    fn test_single_call() {
        let json = serde_json::to_string(&check()).unwrap();
        assert_eq!(json, r#"{"status":"ok","service":"api-gateway"}"#);
        assert_eq!(check(), expected());
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let results: Vec<_> = (0..50).map(|_| check()).collect();
        assert!(results.iter().all(|r| *r == expected()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_calls() {
        let handles: Vec<_> = (0..100).map(|_| tokio::spawn(async { check() })).collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), expected());
        }
    }

    #[test]
    fn test_concurrent_calls_across_threads() {
        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..100).map(|_| scope.spawn(check)).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.len(), 100);
        assert!(results.iter().all(|r| *r == expected()));
    }

    #[test]
    fn test_json_round_trip() {
        let original = check();
        let text = serde_json::to_string(&original).unwrap();
        let parsed: HealthStatus = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, original);
    }
}
