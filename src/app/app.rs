// Main ranking application implementation.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cluster::{ApiServerSource, ClusterSource};
use crate::config::{Config, ConfigTrait};
use crate::liveness::{self, Prober};
use crate::ranking::LoadRanker;
use crate::shutdown::GracefulShutdown;

use super::server::HttpServer;

/// Encapsulates the long-lived application state: the cluster client,
/// the ranking pipeline and the HTTP server.
#[derive(Clone)]
pub struct App {
    shutdown_token: CancellationToken,
    probe: Arc<liveness::Probe>,
    server: Arc<HttpServer>,
}

impl App {
    /// Creates the application, connecting to the cluster API server.
    ///
    /// Fails on unresolvable cluster configuration; this is the only place
    /// where a configuration error is fatal.
    pub fn new(
        shutdown_token: CancellationToken,
        cfg: Config,
        probe: Arc<liveness::Probe>,
    ) -> Result<Self> {
        cfg.validate().context("invalid configuration")?;
        let source = ApiServerSource::new(cfg.cluster())
            .context("failed to set up the cluster API client")?;
        Self::with_source(shutdown_token, cfg, probe, Arc::new(source))
    }

    /// Creates the application on top of an arbitrary cluster source.
    pub fn with_source(
        shutdown_token: CancellationToken,
        cfg: Config,
        probe: Arc<liveness::Probe>,
        source: Arc<dyn ClusterSource>,
    ) -> Result<Self> {
        let ranker = Arc::new(LoadRanker::new(source, cfg.ranking()));
        let server = Arc::new(HttpServer::new(
            shutdown_token.clone(),
            cfg,
            ranker,
            probe.clone(),
        )?);

        Ok(Self {
            shutdown_token,
            probe,
            server,
        })
    }

    /// Binds the listener, then serves in the background and closes the app
    /// once the server stops. Returns as soon as the server is accepting.
    pub async fn serve(&self, gsh: Arc<GracefulShutdown>) -> Result<()> {
        // Register liveness target before serving.
        self.probe
            .watch(vec![Arc::new(self.clone()) as Arc<dyn liveness::Service>]);

        let listener = self.server.bind().await?;

        let app = self.clone();
        gsh.add(1);

        tokio::task::spawn(async move {
            if let Err(e) = app.server.serve(listener).await {
                error!(
                    component = "app",
                    scope = "server",
                    event = "serve_failed",
                    error = %e,
                    "server failed to serve"
                );
            }

            app.close();

            // Signal graceful shutdown
            gsh.done();
        });

        info!(
            component = "app",
            event = "started",
            addr = ?self.local_addr(),
            "application lifecycle"
        );

        Ok(())
    }

    /// Returns the address the HTTP server is bound to.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.local_addr()
    }

    /// Checks whether the HTTP server is still alive.
    pub fn is_alive(&self) -> bool {
        if !self.server.is_alive() {
            warn!(
                component = "app",
                scope = "http_server",
                event = "gone_away",
                "http server has gone away"
            );
            return false;
        }
        true
    }

    /// Closes application resources.
    pub fn close(&self) {
        self.server.close();
        self.shutdown_token.cancel();

        info!(
            component = "app",
            event = "stopped",
            "application lifecycle"
        );
    }
}

/// AppService implements liveness::Service for the App
impl liveness::Service for App {
    fn name(&self) -> &'static str {
        "app"
    }

    fn is_alive(&self, _timeout: Duration) -> bool {
        App::is_alive(self)
    }
}
