// Main entrypoint for the noderank service.

use noderank::app::App;
use noderank::config::{Config, ConfigTrait};
use noderank::controller::metrics::init_prometheus_exporter;
use noderank::liveness;
use noderank::shutdown::GracefulShutdown;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const CONFIG_PATH: &str = "cfg/noderank.cfg.yaml";
const CONFIG_PATH_LOCAL: &str = "cfg/noderank.cfg.local.yaml";

const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);

/// noderank - ranks cluster nodes by the number of pods placed on them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, value_name = "FILE")]
    cfg: Option<PathBuf>,
}

/// Resolves the number of runtime worker threads.
fn worker_threads(cfg: &Config) -> usize {
    let cores = cfg.runtime().num_cpus;
    if cores == 0 {
        let cores = num_cpus::get();
        info!(
            component = "main",
            event = "num_cpus_configured",
            num_cpus = cores,
            "Available cores value configured (using all available cores)"
        );
        cores
    } else {
        warn!(
            component = "main",
            event = "num_cpus_configured",
            num_cpus = cores,
            "Available cores value configured"
        );
        cores
    }
}

/// Loads the configuration struct from YAML file.
/// Tries local config first, then falls back to default config.
fn load_cfg(path: Option<PathBuf>) -> Result<Config> {
    if let Some(custom_path) = path {
        return Config::load(&custom_path)
            .with_context(|| format!("failed to load custom config from {:?}", custom_path));
    }

    match Config::load(CONFIG_PATH_LOCAL) {
        Ok(cfg) => Ok(cfg),
        Err(_) => Config::load(CONFIG_PATH)
            .with_context(|| format!("failed to load config from {}", CONFIG_PATH)),
    }
}

/// Configures structured logging based on configuration.
fn configure_logger(cfg: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let log_level = cfg
        .logs()
        .and_then(|logs| logs.level.as_deref())
        .unwrap_or("info");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if cfg.is_prod() {
        // Production: JSON format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        // Development: Pretty console format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = load_cfg(args.cfg)?;

    // Logger must be configured after config is loaded
    configure_logger(&cfg);

    info!(
        component = "config",
        event = "load_success",
        env = %cfg.noderank.env,
        "config loaded"
    );

    if cfg.is_metrics_enabled() {
        if let Err(e) = init_prometheus_exporter() {
            warn!(
                component = "main",
                event = "metrics_init_failed",
                error = %e,
                "metrics endpoint will not be available"
            );
        }
    }

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads(&cfg))
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?
        .block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<()> {
    // Create cancellation token for graceful shutdown
    let shutdown_token = CancellationToken::new();

    // Setup graceful shutdown handler
    let graceful_shutdown = Arc::new(GracefulShutdown::new(shutdown_token.clone()));
    graceful_shutdown.set_graceful_timeout(GRACEFUL_SHUTDOWN_TIMEOUT);

    // Initialize liveness probe for Kubernetes health checks
    let probe = Arc::new(liveness::Probe::new(cfg.probe_timeout()));

    // Cluster client setup errors are fatal
    let app = App::new(shutdown_token.clone(), cfg, probe).map_err(|e| {
        error!(
            component = "main",
            scope = "app",
            event = "init_failed",
            error = ?e,
            "failed to initialize app"
        );
        e
    })?;

    if let Err(e) = app.serve(graceful_shutdown.clone()).await {
        error!(
            component = "main",
            scope = "app",
            event = "start_failed",
            error = ?e,
            "failed to start app"
        );
        shutdown_token.cancel();
        return Err(e);
    }

    // Listen for OS signals or cancellation and wait for graceful shutdown
    if let Err(e) = graceful_shutdown.await_shutdown().await {
        error!(
            component = "main",
            scope = "service",
            event = "graceful_shutdown_failed",
            error = %e,
            "failed to gracefully shut down service"
        );
        return Err(e);
    }

    Ok(())
}
