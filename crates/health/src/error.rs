use thiserror::Error;

/// Errors raised while assembling readiness checks.
///
/// Probe failures are not errors: they are reported through
/// [`Probe`](crate::Probe) and surface in the readiness report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HealthError {
    /// An upstream entry could not be parsed.
    #[error("Invalid upstream '{spec}': {reason}")]
    InvalidUpstream { spec: String, reason: String },
}

impl HealthError {
    pub(crate) fn invalid_upstream(spec: &str, reason: impl Into<String>) -> Self {
        HealthError::InvalidUpstream {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for health operations.
pub type Result<T> = std::result::Result<T, HealthError>;
