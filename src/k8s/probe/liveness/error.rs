// Error definitions for the liveness probe.

use std::time::Duration;

/// Returned (and logged) when a probe deadline is below the supported minimum.
#[derive(Debug, Clone, thiserror::Error)]
#[error("liveness probe timeout {given:?} is shorter than the minimum {min:?}")]
pub struct TimeoutIsTooShortError {
    pub given: Duration,
    pub min: Duration,
}
