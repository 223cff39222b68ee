// Package controller provides the host ranking controller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde::Serialize;
use std::error::Error;
use std::sync::Arc;
use tracing::error;

use crate::http::Controller;
use crate::metrics;
use crate::ranking::LoadRanker;

pub const RANK_PATH: &str = "/";

/// JSON body of a failed ranking.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// RankController answers with the cluster's hosts, most loaded first.
///
/// It owns `/` and is also the router fallback, so any path not claimed by
/// another controller triggers a ranking. Query parameters are ignored.
#[derive(Clone)]
pub struct RankController {
    ranker: Arc<LoadRanker>,
    success_status: StatusCode,
}

impl RankController {
    /// Creates a new rank controller. Non-2xx statuses fall back to 200.
    pub fn new(ranker: Arc<LoadRanker>, success_status: u16) -> Self {
        let success_status = StatusCode::from_u16(success_status)
            .ok()
            .filter(StatusCode::is_success)
            .unwrap_or(StatusCode::OK);
        Self {
            ranker,
            success_status,
        }
    }

    /// Handles the rank request.
    async fn rank(&self) -> Response {
        metrics::add_requests(1);

        match self.ranker.rank_hosts().await {
            Ok(hosts) => (self.success_status, Json(hosts)).into_response(),
            Err(e) => {
                let message = error_chain(&e);
                error!(
                    component = "controller",
                    scope = "rank",
                    event = "fetch_failed",
                    error = %message,
                    "failed to list workload instances"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody { error: message }),
                )
                    .into_response()
            }
        }
    }
}

impl Controller for RankController {
    fn add_route(&self, router: Router) -> Router {
        let route_controller = self.clone();
        let fallback_controller = self.clone();
        router
            .route(
                RANK_PATH,
                any(move || {
                    let controller = route_controller.clone();
                    async move { controller.rank().await }
                }),
            )
            .fallback(move || {
                let controller = fallback_controller.clone();
                async move { controller.rank().await }
            })
    }
}

/// Renders an error and its sources as `outer: inner: root`.
fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
