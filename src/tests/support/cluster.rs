// Fake cluster API server for integration tests.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use parking_lot::Mutex;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::cluster::api_server::PODS_PATH;

struct Reply {
    status: u16,
    body: String,
    delay: Duration,
}

struct Shared {
    reply: Mutex<Reply>,
    hits: AtomicU64,
    last_authorization: Mutex<Option<String>>,
}

/// Serves `GET /api/v1/pods` over plain HTTP on an ephemeral port.
/// The reply can be swapped between requests.
pub struct FakeApiServer {
    addr: SocketAddr,
    shared: Arc<Shared>,
    handle: JoinHandle<()>,
}

impl FakeApiServer {
    /// Starts the server with an empty pod list.
    pub async fn start() -> Self {
        let shared = Arc::new(Shared {
            reply: Mutex::new(Reply {
                status: 200,
                body: pod_list(&[]),
                delay: Duration::ZERO,
            }),
            hits: AtomicU64::new(0),
            last_authorization: Mutex::new(None),
        });

        let router = Router::new()
            .route(PODS_PATH, get(list_pods))
            .with_state(shared.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake API server");
        let addr = listener.local_addr().expect("fake API server address");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("[fake-api] serve failed: {}", e);
            }
        });

        Self {
            addr,
            shared,
            handle,
        }
    }

    /// Base URL to use as `cluster.api_server`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answers with one running pod per entry ("" = pending, no node).
    pub fn set_pods(&self, hosts: &[&str]) {
        self.respond_raw(200, &pod_list(hosts));
    }

    /// Answers with a `meta.v1.Status` failure document.
    pub fn fail_with(&self, status: u16, body: &str) {
        self.respond_raw(status, body);
    }

    /// Answers with an arbitrary status and body.
    pub fn respond_raw(&self, status: u16, body: &str) {
        let mut reply = self.shared.reply.lock();
        reply.status = status;
        reply.body = body.to_string();
    }

    /// Delays every response.
    pub fn set_delay(&self, delay: Duration) {
        self.shared.reply.lock().delay = delay;
    }

    /// Number of pod listings served.
    pub fn hits(&self) -> u64 {
        self.shared.hits.load(Ordering::SeqCst)
    }

    /// Authorization header of the most recent request.
    pub fn last_authorization(&self) -> Option<String> {
        self.shared.last_authorization.lock().clone()
    }
}

impl Drop for FakeApiServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn list_pods(State(shared): State<Arc<Shared>>, headers: HeaderMap) -> impl IntoResponse {
    shared.hits.fetch_add(1, Ordering::SeqCst);
    *shared.last_authorization.lock() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let (status, body, delay) = {
        let reply = shared.reply.lock();
        (reply.status, reply.body.clone(), reply.delay)
    };

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

/// Renders a `v1.PodList` with one pod per host entry.
pub fn pod_list(hosts: &[&str]) -> String {
    let items: Vec<serde_json::Value> = hosts
        .iter()
        .enumerate()
        .map(|(i, host)| {
            let mut spec = json!({ "containers": [{ "name": "app", "image": "nginx" }] });
            if !host.is_empty() {
                spec["nodeName"] = json!(host);
            }
            json!({
                "metadata": { "name": format!("pod-{}", i), "namespace": "default", "uid": format!("uid-{}", i) },
                "spec": spec,
                "status": { "phase": if host.is_empty() { "Pending" } else { "Running" } },
            })
        })
        .collect();

    json!({
        "kind": "PodList",
        "apiVersion": "v1",
        "metadata": { "resourceVersion": "1" },
        "items": items,
    })
    .to_string()
}
