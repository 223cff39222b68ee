// Package liveness provides the Prober trait for liveness checking.

use std::sync::Arc;

use super::Service;

/// Prober can handle services/applications.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    /// Watches services for liveness.
    fn watch(&self, services: Vec<Arc<dyn Service>>);

    /// Checks whether every watched service is alive within the probe timeout.
    async fn is_alive(&self) -> bool;
}
