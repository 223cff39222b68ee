pub mod app;
pub mod cluster;
pub mod config;
pub mod controller;
pub mod http;
#[path = "k8s/probe/liveness/mod.rs"]
pub mod liveness;
pub mod metrics;
pub mod middleware;
pub mod model;
pub mod ranking;
pub mod shutdown;

#[cfg(test)]
mod tests;

#[cfg(test)]
pub use tests::support;
