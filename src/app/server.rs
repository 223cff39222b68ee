// HTTP server wiring for the ranking application.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::{Config, ConfigTrait};
use crate::http::{Controller, Middleware, Server as HttpServerTrait};
use crate::liveness;
use crate::ranking::LoadRanker;

/// HTTP server implementation that wraps all dependencies.
pub struct HttpServer {
    ctx: CancellationToken,
    server: Arc<dyn HttpServerTrait>,
    is_server_alive: Arc<AtomicBool>,
}

impl HttpServer {
    /// Creates a new HttpServer with every controller and middleware mounted.
    pub fn new(
        ctx: CancellationToken,
        cfg: Config,
        ranker: Arc<LoadRanker>,
        probe: Arc<liveness::Probe>,
    ) -> Result<Self> {
        let server = Self::make_http_server(ctx.clone(), &cfg, ranker, probe)?;

        Ok(Self {
            ctx,
            server,
            is_server_alive: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Returns true if the server is marked as alive.
    pub fn is_alive(&self) -> bool {
        self.is_server_alive.load(Ordering::Relaxed)
    }

    /// Returns the bound address, if any.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.local_addr()
    }

    /// Binds the listen address; errors surface before anything is spawned.
    pub async fn bind(&self) -> Result<TcpListener> {
        let listener = self.server.bind().await?;
        self.is_server_alive.store(true, Ordering::Relaxed);
        Ok(listener)
    }

    /// Serves requests until shutdown (blocking call).
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let result = self.server.serve(listener).await;

        self.is_server_alive.store(false, Ordering::Relaxed);
        result
    }

    /// Closes the HTTP server.
    pub fn close(&self) {
        self.ctx.cancel();
    }

    /// Creates the HTTP server instance with controllers and middlewares.
    fn make_http_server(
        ctx: CancellationToken,
        cfg: &Config,
        ranker: Arc<LoadRanker>,
        probe: Arc<liveness::Probe>,
    ) -> Result<Arc<dyn HttpServerTrait>> {
        let controllers = Self::controllers(cfg, ranker, probe);
        let middlewares = Self::middlewares();

        // Compose server with controllers and middlewares.
        let server = crate::http::HttpServer::new(ctx, cfg.clone(), controllers, middlewares)?;
        Ok(server as Arc<dyn HttpServerTrait>)
    }

    /// Returns all HTTP controllers for the server.
    fn controllers(
        cfg: &Config,
        ranker: Arc<LoadRanker>,
        probe: Arc<liveness::Probe>,
    ) -> Vec<Box<dyn Controller>> {
        use crate::controller;

        let mut controllers: Vec<Box<dyn Controller>> = vec![
            // Healthcheck probe endpoint
            Box::new(controller::LivenessProbeController::new(probe)),
        ];

        if cfg.is_metrics_enabled() {
            // Metrics endpoint
            controllers.push(Box::new(controller::PrometheusMetricsController::new()));
        }

        // Host ranking, registered last since it also installs the fallback
        controllers.push(Box::new(controller::RankController::new(
            ranker,
            cfg.api().success_status(),
        )));

        controllers
    }

    /// Returns the request middlewares for the server, executed in reverse order.
    fn middlewares() -> Vec<Box<dyn Middleware>> {
        vec![
            // Exec first - request tracing
            Box::new(crate::middleware::TraceMiddleware::new()),
            // Exec second - panic recovery
            Box::new(crate::middleware::PanicRecoverMiddleware::new()),
        ]
    }
}
