// Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const PROD: &str = "prod";
#[allow(dead_code)]
pub const DEV: &str = "dev";
#[allow(dead_code)]
pub const DEBUG: &str = "debug";
#[allow(dead_code)]
pub const TEST: &str = "test";

const DEFAULT_NAME: &str = "noderank";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "80";
const DEFAULT_SUCCESS_STATUS: u16 = 200;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_TOKEN_RELOAD: Duration = Duration::from_secs(60);
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeRank {
    #[serde(rename = "noderank")]
    pub noderank: NodeRankBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeRankBox {
    pub env: String,
    pub logs: Option<Logs>,
    pub runtime: Option<Runtime>,
    pub api: Option<Api>,
    pub cluster: Option<Cluster>,
    pub ranking: Option<Ranking>,
    pub metrics: Option<Metrics>,
    pub k8s: Option<K8S>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Runtime {
    pub num_cpus: usize,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Api {
    pub name: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    #[serde(rename = "success_status")]
    pub success_status: Option<u16>,
    #[serde(rename = "request_timeout", default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

impl Api {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// Resolves the listen address. Accepts both `80` and `:80` port forms.
    pub fn addr(&self) -> Result<SocketAddr> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let port = self.port.as_deref().unwrap_or(DEFAULT_PORT);
        let port = port.trim_start_matches(':');

        let addr = if host.contains(':') && !host.starts_with('[') {
            format!("[{}]:{}", host, port)
        } else {
            format!("{}:{}", host, port)
        };
        addr.parse()
            .with_context(|| format!("failed to parse server address {:?}", addr))
    }

    pub fn success_status(&self) -> u16 {
        self.success_status.unwrap_or(DEFAULT_SUCCESS_STATUS)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }
}

/// Connection settings for the cluster API server.
/// Unset fields fall back to the in-cluster service account.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Cluster {
    #[serde(rename = "api_server")]
    pub api_server: Option<String>,
    #[serde(rename = "token_file")]
    pub token_file: Option<String>,
    #[serde(rename = "ca_file")]
    pub ca_file: Option<String>,
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
    #[serde(rename = "token_reload", default, with = "humantime_serde")]
    pub token_reload: Option<Duration>,
}

impl Cluster {
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn token_reload(&self) -> Duration {
        self.token_reload.unwrap_or(DEFAULT_TOKEN_RELOAD)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Ranking {
    /// Whether pods not yet bound to a node are ranked as an empty host.
    #[serde(rename = "include_unscheduled", default)]
    pub include_unscheduled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Metrics {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Probe {
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct K8S {
    pub probe: Probe,
}

// Config trait
pub trait ConfigTrait {
    fn logs(&self) -> Option<&Logs>;
    fn is_prod(&self) -> bool;
    #[allow(dead_code)]
    fn is_debug(&self) -> bool;
    #[allow(dead_code)]
    fn is_dev(&self) -> bool;
    #[allow(dead_code)]
    fn is_test(&self) -> bool;
    fn runtime(&self) -> &Runtime;
    fn api(&self) -> &Api;
    fn cluster(&self) -> &Cluster;
    fn ranking(&self) -> &Ranking;
    fn is_metrics_enabled(&self) -> bool;
    fn probe_timeout(&self) -> Duration;
}

// Config type alias for convenience
pub type Config = NodeRank;

static DEFAULT_RUNTIME: Runtime = Runtime { num_cpus: 0 };
static DEFAULT_API: Api = Api {
    name: None,
    host: None,
    port: None,
    success_status: None,
    request_timeout: None,
};
static DEFAULT_CLUSTER: Cluster = Cluster {
    api_server: None,
    token_file: None,
    ca_file: None,
    timeout: None,
    token_reload: None,
};
static DEFAULT_RANKING: Ranking = Ranking {
    include_unscheduled: false,
};

impl ConfigTrait for Config {
    fn logs(&self) -> Option<&Logs> {
        self.noderank.logs.as_ref()
    }

    fn is_prod(&self) -> bool {
        self.noderank.env == PROD
    }

    fn is_debug(&self) -> bool {
        self.noderank.env == DEBUG
    }

    fn is_dev(&self) -> bool {
        self.noderank.env == DEV
    }

    fn is_test(&self) -> bool {
        self.noderank.env == TEST
    }

    fn runtime(&self) -> &Runtime {
        self.noderank.runtime.as_ref().unwrap_or(&DEFAULT_RUNTIME)
    }

    fn api(&self) -> &Api {
        self.noderank.api.as_ref().unwrap_or(&DEFAULT_API)
    }

    fn cluster(&self) -> &Cluster {
        self.noderank.cluster.as_ref().unwrap_or(&DEFAULT_CLUSTER)
    }

    fn ranking(&self) -> &Ranking {
        self.noderank.ranking.as_ref().unwrap_or(&DEFAULT_RANKING)
    }

    fn is_metrics_enabled(&self) -> bool {
        self.noderank.metrics.as_ref().map_or(true, |m| m.enabled)
    }

    fn probe_timeout(&self) -> Duration {
        self.noderank
            .k8s
            .as_ref()
            .and_then(|k8s| k8s.probe.timeout)
            .unwrap_or(DEFAULT_PROBE_TIMEOUT)
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Resolve absolute path
        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        // Read file
        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        Self::parse(&data).with_context(|| format!("invalid config in {:?}", abs_path))
    }

    /// Parses and validates configuration from YAML text.
    pub fn parse(data: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(data).context("unmarshal yaml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks values that parse but cannot be served.
    pub fn validate(&self) -> Result<()> {
        let status = self.api().success_status();
        if !(200..300).contains(&status) {
            anyhow::bail!("api.success_status must be a 2xx code, got {}", status);
        }

        self.api().addr()?;

        let fetch_timeout = self.cluster().timeout();
        if fetch_timeout.is_zero() {
            anyhow::bail!("cluster.timeout must be greater than zero");
        }

        // A slow fetch must fail as a ranking error, not as a request timeout.
        let request_timeout = self.api().request_timeout();
        if fetch_timeout >= request_timeout {
            anyhow::bail!(
                "cluster.timeout ({:?}) must be shorter than api.request_timeout ({:?})",
                fetch_timeout,
                request_timeout
            );
        }

        Ok(())
    }
}

// Test config is always available for integration tests
mod test_config;
#[allow(dead_code)]
pub use test_config::new_test_config;
