//! HTTP server implementation.
//

use anyhow::{Context, Result};
use axum::Router;
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

use crate::config::{Config, ConfigTrait};
use crate::controller::controller::Controller;
use crate::middleware::middleware::Middleware;

/// Server trait for HTTP server operations.
#[async_trait::async_trait]
pub trait Server: Send + Sync {
    /// Binds the configured address.
    async fn bind(&self) -> Result<TcpListener>;

    /// Serves requests on the listener until the shutdown token is cancelled.
    async fn serve(&self, listener: TcpListener) -> Result<()>;

    /// Returns the bound address once `bind` succeeded.
    fn local_addr(&self) -> Option<SocketAddr>;
}

/// HTTP server implementation.
pub struct HttpServer {
    shutdown_token: CancellationToken,
    config: Config,
    router: Router,
    local_addr: Mutex<Option<SocketAddr>>,
}

impl HttpServer {
    /// Creates a new HTTP server.
    pub fn new(
        shutdown_token: CancellationToken,
        config: Config,
        controllers: Vec<Box<dyn Controller>>,
        middlewares: Vec<Box<dyn Middleware>>,
    ) -> Result<Arc<Self>> {
        let router = Self::build_router(controllers);
        let router = Self::merge_middlewares(router, middlewares, config.api().request_timeout());

        Ok(Arc::new(Self {
            shutdown_token,
            config,
            router,
            local_addr: Mutex::new(None),
        }))
    }

    /// Builds the router with all controllers.
    fn build_router(controllers: Vec<Box<dyn Controller>>) -> Router {
        let mut router = Router::new();

        // Add routes from all controllers
        for controller in controllers {
            router = controller.add_route(router);
        }

        router
    }

    /// Merges middlewares into the router.
    fn merge_middlewares(
        router: Router,
        middlewares: Vec<Box<dyn Middleware>>,
        request_timeout: Duration,
    ) -> Router {
        // Add timeout layer innermost so a timed out request is still traced
        let mut result = router.layer(TimeoutLayer::new(request_timeout));

        // Apply middlewares in reverse order (last middleware wraps first)
        for middleware in middlewares.iter().rev() {
            result = middleware.apply(result);
        }

        result
    }
}

#[async_trait::async_trait]
impl Server for HttpServer {
    async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.api().addr()?;

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind TCP listener on {}", addr))?;
        let bound = listener
            .local_addr()
            .context("Failed to read bound address")?;
        *self.local_addr.lock() = Some(bound);

        Ok(listener)
    }

    async fn serve(&self, listener: TcpListener) -> Result<()> {
        let name = self.config.api().name();
        let addr = self
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_default();

        info!(
            component = "server",
            event = "started",
            name = name,
            addr = %addr,
            "server started"
        );

        // Create shutdown signal
        let shutdown_token = self.shutdown_token.clone();

        // Start server with graceful shutdown
        let serve_future =
            axum::serve(listener, self.router.clone()).with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
            });

        // Run server
        if let Err(e) = serve_future.await {
            error!(
                component = "server",
                event = "listen_and_serve_failed",
                name = name,
                addr = %addr,
                error = %e,
                "server failed to listen and serve"
            );
            return Err(e.into());
        }

        info!(
            component = "server",
            event = "stopped",
            name = name,
            addr = %addr,
            "server stopped"
        );

        Ok(())
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock()
    }
}
