// Package liveness provides Kubernetes liveness probe functionality.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

pub mod error;
pub mod prober;
pub mod service;


pub use error::TimeoutIsTooShortError;
pub use prober::Prober;
pub use service::Service;

const MIN_TIMEOUT: Duration = Duration::from_millis(1);
const FALLBACK_TIMEOUT: Duration = Duration::from_millis(10);

/// Liveness probe implementation
pub struct Probe {
    services: RwLock<Vec<Arc<dyn Service>>>,
    timeout: Duration,
}

impl Probe {
    /// Creates a new liveness probe
    pub fn new(timeout_duration: Duration) -> Self {
        let timeout = if timeout_duration < MIN_TIMEOUT {
            warn!(
                component = "liveness",
                event = "timeout_raised",
                error = %TimeoutIsTooShortError {
                    given: timeout_duration,
                    min: MIN_TIMEOUT,
                },
                fallback = ?FALLBACK_TIMEOUT,
                "probe timeout raised"
            );
            FALLBACK_TIMEOUT
        } else {
            timeout_duration
        };

        Self {
            services: RwLock::new(Vec::new()),
            timeout,
        }
    }

    /// Returns the probe deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait::async_trait]
impl Prober for Probe {
    fn watch(&self, services: Vec<Arc<dyn Service>>) {
        self.services.write().extend(services);
    }

    async fn is_alive(&self) -> bool {
        let services = self.services.read().clone();
        if services.is_empty() {
            warn!(
                component = "liveness",
                event = "no_services",
                "liveness probe has no watched services"
            );
            return false;
        }

        let probe_timeout = self.timeout;
        // Checks run off the async workers so a stuck service cannot stall them.
        let check = tokio::task::spawn_blocking(move || {
            for service in &services {
                if !service.is_alive(probe_timeout) {
                    warn!(
                        component = "liveness",
                        event = "service_dead",
                        service = service.name(),
                        "watched service is not alive"
                    );
                    return false;
                }
            }
            true
        });

        match timeout(probe_timeout, check).await {
            Ok(Ok(is_alive)) => is_alive,
            Ok(Err(e)) => {
                warn!(
                    component = "liveness",
                    event = "check_failed",
                    error = %e,
                    "liveness check task failed"
                );
                false
            }
            Err(_) => {
                warn!(
                    component = "liveness",
                    event = "deadline_exceeded",
                    timeout = ?probe_timeout,
                    "liveness probe deadline exceeded while checking service"
                );
                false
            }
        }
    }
}
