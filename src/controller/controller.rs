// Route registration interface shared by every HTTP endpoint.

use axum::Router;

/// An endpoint that mounts its routes onto the server router.
///
/// Controllers are applied in order, so one that installs a fallback must
/// come last.
pub trait Controller: Send + Sync {
    fn add_route(&self, router: Router) -> Router;
}
