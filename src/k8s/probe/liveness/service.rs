// Service trait for liveness checking

use std::time::Duration;

/// A long-lived component whose health backs the liveness probe.
pub trait Service: Send + Sync {
    /// Name reported when the service is found dead.
    fn name(&self) -> &'static str {
        "service"
    }

    /// Checks if the service is alive
    fn is_alive(&self, timeout: Duration) -> bool;
}
