// HTTP API controllers: host ranking, liveness probe and metrics.

pub mod controller;
pub mod metrics;
pub mod probe;
pub mod rank;

#[cfg(test)]
mod rank_test;

// Re-export controller types for convenience
pub use metrics::PrometheusMetricsController;
pub use probe::LivenessProbeController;
pub use rank::RankController;
