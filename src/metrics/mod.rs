//! Prometheus metrics functionality.
//
//! Metrics organization:
//! - Service metrics: metrics::meter (requests, fetch errors, ranked hosts, etc.)
//! - Process metrics: metrics-process (process_resident_memory_bytes, process_cpu_*, etc.)
//! - Exporter and `/metrics` endpoint: controller::metrics

pub mod meter;

// Re-export commonly used items
pub use meter::*;
