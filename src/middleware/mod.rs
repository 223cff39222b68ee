// Router middlewares: panic recovery and request tracing.

pub mod middleware;
pub mod recover_middleware;
pub mod trace_middleware;

#[cfg(test)]
mod recover_middleware_test;

pub use middleware::Middleware;
pub use recover_middleware::{panics_counter, PanicRecoverMiddleware};
pub use trace_middleware::TraceMiddleware;
