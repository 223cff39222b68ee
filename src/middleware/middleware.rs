// Router-wide layer interface.

use axum::Router;

/// Wraps the whole router (all controllers) with one layer.
pub trait Middleware: Send + Sync {
    fn apply(&self, router: Router) -> Router;
}
