// Error definitions for the cluster-state source.

use std::path::PathBuf;
use std::time::Duration;

/// Connection or credential setup failed before a fetch could be made.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("cluster API server is not configured and KUBERNETES_SERVICE_HOST/KUBERNETES_SERVICE_PORT are not set")]
    MissingApiServer,
    #[error("invalid cluster API server address {addr:?}")]
    InvalidApiServer {
        addr: String,
        #[source]
        source: hyper::http::uri::InvalidUri,
    },
    #[error("unsupported scheme in cluster API server address {0:?} (expected http or https)")]
    UnsupportedScheme(String),
    #[error("failed to read {kind} from {path:?}")]
    ReadCredential {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("service account token in {0:?} is empty")]
    EmptyToken(PathBuf),
    #[error("service account token in {0:?} is not a valid header value")]
    InvalidToken(PathBuf),
    #[error("no certificates found in {0:?}")]
    NoCertificates(PathBuf),
    #[error("invalid CA certificate in {path:?}")]
    InvalidCertificate {
        path: PathBuf,
        #[source]
        source: rustls::Error,
    },
    #[error("failed to build TLS client configuration")]
    Tls(#[source] rustls::Error),
    #[error("failed to load native root certificates")]
    NativeRoots(#[source] std::io::Error),
}

/// The cluster-state source could not be queried successfully.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build request to {uri}")]
    Request {
        uri: String,
        #[source]
        source: hyper::http::Error,
    },
    #[error("request to {uri} failed")]
    Transport {
        uri: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },
    #[error("request to {uri} timed out after {timeout:?}")]
    Timeout { uri: String, timeout: Duration },
    #[error("API server responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("failed to read response body from {uri}")]
    Body {
        uri: String,
        #[source]
        source: hyper::Error,
    },
    #[error("failed to decode pod list")]
    Decode(#[source] serde_json::Error),
    #[error("cluster credentials are unavailable")]
    Credentials(#[from] ConfigurationError),
}
