//! Status values reported by the health surfaces.

use common::ServiceName;
use serde::{Deserialize, Serialize};

/// Overall state of the reporting service.
///
/// Liveness only ever reports `Ok`. `Degraded` and `Unavailable` come from
/// readiness aggregation:
/// ```text
/// all checks healthy            ──► Ok
/// only optional checks failing  ──► Degraded
/// any critical check failing    ──► Unavailable
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Ok,
    Degraded,
    Unavailable,
}

impl Status {
    /// Returns true if an instance in this state should keep receiving traffic.
    pub fn is_serving(&self) -> bool {
        !matches!(self, Status::Unavailable)
    }

    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::Degraded => "degraded",
            Status::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Liveness payload: `{"status":"ok","service":"api-gateway"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: Status,
    pub service: ServiceName,
}

impl HealthStatus {
    /// Creates an `ok` status for the given service.
    pub fn ok(service: ServiceName) -> Self {
        Self {
            status: Status::Ok,
            service,
        }
    }
}
