//! Dependency probe capability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Outcome of a single dependency probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probe {
    pub healthy: bool,
    pub detail: String,
}

impl Probe {
    pub fn healthy(detail: impl Into<String>) -> Self {
        Self {
            healthy: true,
            detail: detail.into(),
        }
    }

    pub fn unhealthy(detail: impl Into<String>) -> Self {
        Self {
            healthy: false,
            detail: detail.into(),
        }
    }
}

/// A named probe aggregated into readiness.
///
/// Implementations report failures through [`Probe::unhealthy`] rather than
/// panicking. The aggregator enforces the timeout, so `probe` does not need
/// to bound its own duration.
#[async_trait]
pub trait Checker: Send + Sync {
    /// Stable identifier used in reports, logs and metric labels.
    fn name(&self) -> &str;

    /// Whether a failure of this checker makes the instance unavailable.
    fn critical(&self) -> bool {
        true
    }

    /// Probes the dependency.
    async fn probe(&self) -> Probe;
}
