// Service bootstrap for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Once};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::app::App;
use crate::config::{self, Config};
use crate::controller::metrics::init_prometheus_exporter;
use crate::liveness;
use crate::shutdown::GracefulShutdown;

static METRICS: Once = Once::new();

/// A running service instance bound to an ephemeral port.
pub struct TestService {
    app: App,
    addr: SocketAddr,
    shutdown_token: CancellationToken,
    graceful_shutdown: Arc<GracefulShutdown>,
}

impl TestService {
    /// Starts the service against the given cluster API server URL.
    pub async fn start(api_server: &str) -> Self {
        Self::start_with(api_server, |_| {}).await
    }

    /// Starts the service after letting the caller adjust the test config.
    pub async fn start_with<F>(api_server: &str, configure: F) -> Self
    where
        F: FnOnce(&mut Config),
    {
        // The recorder is process-global; every test shares it.
        METRICS.call_once(|| {
            if let Err(e) = init_prometheus_exporter() {
                eprintln!("[harness] metrics exporter unavailable: {}", e);
            }
        });

        let mut cfg = config::new_test_config();
        if let Some(cluster) = cfg.noderank.cluster.as_mut() {
            cluster.api_server = Some(api_server.to_string());
        }
        configure(&mut cfg);

        let shutdown_token = CancellationToken::new();
        let graceful_shutdown = Arc::new(GracefulShutdown::new(shutdown_token.clone()));
        graceful_shutdown.set_graceful_timeout(Duration::from_secs(5));

        let probe = Arc::new(liveness::Probe::new(Duration::from_secs(1)));
        let app = App::new(shutdown_token.clone(), cfg, probe).expect("create app");
        app.serve(graceful_shutdown.clone()).await.expect("serve app");

        let addr = app.local_addr().expect("app must be bound");

        Self {
            app,
            addr,
            shutdown_token,
            graceful_shutdown,
        }
    }

    /// Base URL of the running service.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn is_alive(&self) -> bool {
        self.app.is_alive()
    }

    /// Cancels the service and waits for the server task to finish.
    pub async fn stop(self) {
        self.shutdown_token.cancel();
        self.graceful_shutdown
            .await_shutdown()
            .await
            .expect("graceful shutdown");
    }
}
