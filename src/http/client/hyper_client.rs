//! Hyper HTTP client configuration for cluster API server requests.
//!
//! The client is built once at startup and shared by every request:
//! - Idle pool per host: 16 connections
//! - Max idle connection duration: 90s
//! - Connection timeout: 3s
//! - TCP keep-alive: 30s
//! - TCP_NODELAY: enabled

use http_body_util::combinators::BoxBody;
use hyper::body::Bytes;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::dns::GaiResolver;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::sync::Arc;
use std::time::Duration;

use crate::cluster::{ConfigurationError, TrustAnchors};

/// Connection pool configuration constants.
pub const CONNS_PER_HOST: usize = 16;
pub const MAX_IDLE_CONN_DURATION: Duration = Duration::from_secs(90);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
pub const TCP_KEEPALIVE: Duration = Duration::from_secs(30);

pub type HyperClient = Client<HttpsConnector<HttpConnector<GaiResolver>>, BoxBody<Bytes, hyper::Error>>;

/// Creates a Hyper HTTP client verifying servers against the given roots.
///
/// Plain `http://` addresses are allowed as well, for API servers reached
/// through `kubectl proxy` or a local sidecar.
pub fn create_client(trust: TrustAnchors) -> Result<HyperClient, ConfigurationError> {
    let resolver = GaiResolver::new();

    let mut http_connector = HttpConnector::new_with_resolver(resolver);
    http_connector.set_nodelay(true);
    http_connector.set_keepalive(Some(TCP_KEEPALIVE));
    http_connector.set_connect_timeout(Some(CONNECT_TIMEOUT));
    http_connector.enforce_http(false);

    let builder = hyper_rustls::HttpsConnectorBuilder::new();
    let builder = match trust {
        TrustAnchors::Native => builder
            .with_native_roots()
            .map_err(ConfigurationError::NativeRoots)?,
        TrustAnchors::Custom(roots) => {
            let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
            let tls_config = rustls::ClientConfig::builder_with_provider(provider)
                .with_safe_default_protocol_versions()
                .map_err(ConfigurationError::Tls)?
                .with_root_certificates(roots)
                .with_no_client_auth();
            builder.with_tls_config(tls_config)
        }
    };

    let tls = builder
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(http_connector);

    Ok(Client::builder(TokioExecutor::new())
        .pool_idle_timeout(MAX_IDLE_CONN_DURATION)
        .pool_max_idle_per_host(CONNS_PER_HOST)
        .retry_canceled_requests(true)
        .build(tls))
}
