//! Cluster API server address, bearer token and TLS trust resolution.
//!
//! Explicit configuration wins; anything left unset falls back to the
//! in-cluster service account (environment variables and the mounted
//! secret directory). Resolution runs once at startup.

use hyper::header::HeaderValue;
use hyper::Uri;
use parking_lot::RwLock;
use rustls::RootCertStore;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::ConfigurationError;
use crate::config::Cluster;

/// Mount point of the pod's service account secret.
pub const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";
const TOKEN_FILE: &str = "token";
const CA_FILE: &str = "ca.crt";

const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";
const SERVICE_PORT_ENV: &str = "KUBERNETES_SERVICE_PORT";

/// Roots used to verify the API server certificate.
pub enum TrustAnchors {
    /// Platform trust store.
    Native,
    /// CA bundle loaded from a PEM file.
    Custom(RootCertStore),
}

/// Everything needed to talk to the API server.
pub struct Credentials {
    pub api_server: Uri,
    pub token: Option<TokenSource>,
    pub trust: TrustAnchors,
}

impl Credentials {
    /// Resolves credentials from the config, the process environment and
    /// the service account mount.
    pub fn resolve(cfg: &Cluster) -> Result<Self, ConfigurationError> {
        Self::resolve_with(cfg, |key| std::env::var(key).ok(), Path::new(SERVICE_ACCOUNT_DIR))
    }

    /// Same as [`Credentials::resolve`] with an injectable environment and
    /// service account directory.
    pub fn resolve_with<F>(cfg: &Cluster, env: F, sa_dir: &Path) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_server = resolve_api_server(cfg, &env)?;
        let is_https = api_server.scheme_str() == Some("https");

        let token = match cfg.token_file.as_deref() {
            Some(path) => Some(TokenSource::load(PathBuf::from(path), cfg.token_reload())?),
            None => {
                let path = sa_dir.join(TOKEN_FILE);
                if path.is_file() {
                    Some(TokenSource::load(path, cfg.token_reload())?)
                } else {
                    None
                }
            }
        };

        let trust = match cfg.ca_file.as_deref() {
            Some(path) => TrustAnchors::Custom(load_roots(Path::new(path))?),
            None => {
                let path = sa_dir.join(CA_FILE);
                if is_https && path.is_file() {
                    TrustAnchors::Custom(load_roots(&path)?)
                } else {
                    TrustAnchors::Native
                }
            }
        };

        info!(
            component = "cluster",
            event = "credentials_resolved",
            api_server = %api_server,
            token = token.is_some(),
            custom_ca = matches!(trust, TrustAnchors::Custom(_)),
            "cluster credentials resolved"
        );

        Ok(Self {
            api_server,
            token,
            trust,
        })
    }
}

fn resolve_api_server<F>(cfg: &Cluster, env: &F) -> Result<Uri, ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    let addr = match cfg.api_server.as_deref().filter(|s| !s.is_empty()) {
        Some(addr) => addr.to_string(),
        None => {
            let host = env(SERVICE_HOST_ENV).filter(|s| !s.is_empty());
            let port = env(SERVICE_PORT_ENV).filter(|s| !s.is_empty());
            match (host, port) {
                (Some(host), Some(port)) if host.contains(':') => format!("https://[{}]:{}", host, port),
                (Some(host), Some(port)) => format!("https://{}:{}", host, port),
                _ => return Err(ConfigurationError::MissingApiServer),
            }
        }
    };

    let uri: Uri = addr
        .parse()
        .map_err(|source| ConfigurationError::InvalidApiServer {
            addr: addr.clone(),
            source,
        })?;

    match uri.scheme_str() {
        Some("http") | Some("https") if uri.authority().is_some() => Ok(uri),
        _ => Err(ConfigurationError::UnsupportedScheme(addr)),
    }
}

fn load_roots(path: &Path) -> Result<RootCertStore, ConfigurationError> {
    let pem = std::fs::read(path).map_err(|source| ConfigurationError::ReadCredential {
        kind: "CA bundle",
        path: path.to_path_buf(),
        source,
    })?;

    let mut roots = RootCertStore::empty();
    for cert in rustls_pemfile::certs(&mut pem.as_slice()) {
        let cert = cert.map_err(|source| ConfigurationError::ReadCredential {
            kind: "CA bundle",
            path: path.to_path_buf(),
            source,
        })?;
        roots
            .add(cert)
            .map_err(|source| ConfigurationError::InvalidCertificate {
                path: path.to_path_buf(),
                source,
            })?;
    }

    if roots.is_empty() {
        return Err(ConfigurationError::NoCertificates(path.to_path_buf()));
    }
    Ok(roots)
}

/// Bearer token read from a file and re-read periodically, since projected
/// service account tokens are rotated by the kubelet.
pub struct TokenSource {
    path: PathBuf,
    reload: Duration,
    cached: RwLock<(HeaderValue, Instant)>,
}

impl TokenSource {
    /// Reads the token once at startup; fails if the file is missing or empty.
    pub fn load(path: PathBuf, reload: Duration) -> Result<Self, ConfigurationError> {
        let value = read_token(&path)?;
        Ok(Self {
            path,
            reload,
            cached: RwLock::new((value, Instant::now())),
        })
    }

    /// Returns the `Authorization` header value, re-reading the file when
    /// the cached copy is older than the reload interval.
    pub async fn header(&self) -> Result<HeaderValue, ConfigurationError> {
        {
            let cached = self.cached.read();
            if cached.1.elapsed() < self.reload {
                return Ok(cached.0.clone());
            }
        }

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| read_error(&self.path, source))?;
        let value = parse_token(&raw, &self.path)?;
        debug!(
            component = "cluster",
            event = "token_reloaded",
            path = ?self.path,
            "service account token reloaded"
        );
        *self.cached.write() = (value.clone(), Instant::now());
        Ok(value)
    }
}

fn read_token(path: &Path) -> Result<HeaderValue, ConfigurationError> {
    let raw = std::fs::read_to_string(path).map_err(|source| read_error(path, source))?;
    parse_token(&raw, path)
}

fn read_error(path: &Path, source: std::io::Error) -> ConfigurationError {
    ConfigurationError::ReadCredential {
        kind: "bearer token",
        path: path.to_path_buf(),
        source,
    }
}

fn parse_token(raw: &str, path: &Path) -> Result<HeaderValue, ConfigurationError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(ConfigurationError::EmptyToken(path.to_path_buf()));
    }

    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| ConfigurationError::InvalidToken(path.to_path_buf()))?;
    value.set_sensitive(true);
    Ok(value)
}
