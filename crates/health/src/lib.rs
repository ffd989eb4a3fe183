//! Health reporting for the api-gateway.
//!
//! Two surfaces are provided:
//! - [`check`], a constant liveness answer that cannot fail.
//! - [`Readiness`], which fans out to registered [`Checker`]s with a
//!   per-probe timeout and folds the results into a [`ReadinessReport`].

pub mod checker;
pub mod checkers;
pub mod error;
pub mod readiness;
pub mod reporter;
pub mod status;

pub use checker::{Checker, Probe};
pub use checkers::{InMemoryChecker, TcpChecker, Upstream, parse_upstreams};
pub use common::ServiceName;
pub use error::{HealthError, Result};
pub use readiness::{
    CheckOutcome, CheckResult, DEFAULT_PROBE_TIMEOUT, Readiness, ReadinessReport, overall_status,
};
pub use reporter::check;
pub use status::{HealthStatus, Status};
