// Liveness probe endpoint for the kubelet.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::http::Controller;
use crate::liveness::{self, Prober};

pub const PROBE_PATH: &str = "/k8s/probe";

#[derive(Serialize)]
struct ProbeBody {
    status: u16,
    message: &'static str,
}

/// LivenessProbeController reports whether the HTTP server loop is alive.
/// It never queries the cluster.
#[derive(Clone)]
pub struct LivenessProbeController {
    probe: Arc<liveness::Probe>,
}

impl LivenessProbeController {
    pub fn new(probe: Arc<liveness::Probe>) -> Self {
        Self { probe }
    }

    async fn probe(&self) -> Response {
        let (status, message) = if self.probe.is_alive().await {
            (StatusCode::OK, "alive")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "not alive")
        };
        let body = ProbeBody {
            status: status.as_u16(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl Controller for LivenessProbeController {
    fn add_route(&self, router: Router) -> Router {
        let probe_controller = self.clone();
        router.route(
            PROBE_PATH,
            get(move || {
                let controller = probe_controller.clone();
                async move { controller.probe().await }
            }),
        )
    }
}
