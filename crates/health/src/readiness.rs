//! Readiness aggregation over registered checkers.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::ServiceName;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::checker::{Checker, Probe};
use crate::status::Status;

/// Upper bound applied to each probe unless overridden.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(2000);

/// How a single probe ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    Healthy,
    Unhealthy,
    TimedOut,
}

impl CheckOutcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, CheckOutcome::Healthy)
    }
}

/// Per-checker entry in a [`ReadinessReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub critical: bool,
    pub outcome: CheckOutcome,
    pub detail: String,
    pub elapsed_ms: u64,
}

/// Aggregated readiness of the service at `checked_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub status: Status,
    pub service: ServiceName,
    pub checked_at: DateTime<Utc>,
    pub checks: Vec<CheckResult>,
}

impl ReadinessReport {
    pub fn is_serving(&self) -> bool {
        self.status.is_serving()
    }

    /// Returns the result for the named checker, if registered.
    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }
}

/// Folds individual results into an overall status.
///
/// Any failing critical check makes the service unavailable; failures limited
/// to optional checks degrade it.
pub fn overall_status(checks: &[CheckResult]) -> Status {
    let mut degraded = false;
    for check in checks.iter().filter(|c| !c.outcome.is_healthy()) {
        if check.critical {
            return Status::Unavailable;
        }
        degraded = true;
    }

    if degraded {
        Status::Degraded
    } else {
        Status::Ok
    }
}

/// Set of checkers evaluated together, each under a bounded timeout.
///
/// Immutable once shared; clone it or wrap it in an `Arc` to hand it to
/// request handlers.
#[derive(Clone)]
pub struct Readiness {
    service: ServiceName,
    checkers: Vec<Arc<dyn Checker>>,
    probe_timeout: Duration,
}

impl Readiness {
    /// Creates an empty aggregator, which always reports `ok`.
    pub fn new(service: ServiceName) -> Self {
        Self {
            service,
            checkers: Vec::new(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn with_checker(mut self, checker: Arc<dyn Checker>) -> Self {
        self.register(checker);
        self
    }

    /// Registers a checker. Results are reported in registration order.
    pub fn register(&mut self, checker: Arc<dyn Checker>) {
        self.checkers.push(checker);
    }

    pub fn service(&self) -> &ServiceName {
        &self.service
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    /// Probes every checker concurrently and aggregates the results.
    #[tracing::instrument(skip(self), fields(checkers = self.checkers.len()))]
    pub async fn evaluate(&self) -> ReadinessReport {
        let probes = self
            .checkers
            .iter()
            .map(|checker| run_probe(checker.as_ref(), self.probe_timeout));
        let checks = join_all(probes).await;
        let status = overall_status(&checks);

        tracing::debug!(%status, "readiness evaluated");

        ReadinessReport {
            status,
            service: self.service.clone(),
            checked_at: Utc::now(),
            checks,
        }
    }
}

impl std::fmt::Debug for Readiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.checkers.iter().map(|c| c.name()).collect();
        f.debug_struct("Readiness")
            .field("service", &self.service)
            .field("checkers", &names)
            .field("probe_timeout", &self.probe_timeout)
            .finish()
    }
}

async fn run_probe(checker: &dyn Checker, limit: Duration) -> CheckResult {
    let name = checker.name().to_string();
    let started = Instant::now();

    let (outcome, detail) = match tokio::time::timeout(limit, checker.probe()).await {
        Ok(Probe {
            healthy: true,
            detail,
        }) => (CheckOutcome::Healthy, detail),
        Ok(Probe {
            healthy: false,
            detail,
        }) => (CheckOutcome::Unhealthy, detail),
        Err(_) => (
            CheckOutcome::TimedOut,
            format!("probe timed out after {}ms", limit.as_millis()),
        ),
    };

    let elapsed = started.elapsed();
    metrics::histogram!("health_probe_duration_seconds", "checker" => name.clone())
        .record(elapsed.as_secs_f64());

    if !outcome.is_healthy() {
        metrics::counter!("health_probe_failures_total", "checker" => name.clone()).increment(1);
        tracing::warn!(checker = %name, ?outcome, %detail, "readiness probe failed");
    }

    CheckResult {
        name,
        critical: checker.critical(),
        outcome,
        detail,
        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
    }
}
