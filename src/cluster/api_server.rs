//! Kubernetes API server implementation of [`ClusterSource`].

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty};
use hyper::header::{ACCEPT, AUTHORIZATION};
use hyper::{Method, Request, Uri};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, warn};

use super::{ClusterSource, ConfigurationError, Credentials, FetchError, TokenSource};
use crate::config::Cluster;
use crate::http::client::{create_client, HyperClient};
use crate::model::{PodList, WorkloadInstanceRecord};

/// Path listing pods across all namespaces.
pub const PODS_PATH: &str = "/api/v1/pods";

/// Longest error body excerpt carried in a [`FetchError::Status`].
const MAX_ERROR_MESSAGE_LEN: usize = 256;

/// Lists pods through the API server's REST interface.
///
/// The HTTP client, address and token source are created once and shared
/// by every request.
pub struct ApiServerSource {
    client: HyperClient,
    pods_uri: Uri,
    token: Option<TokenSource>,
    timeout: Duration,
}

/// Subset of `meta.v1.Status` returned on API errors.
#[derive(Deserialize)]
struct ApiStatus {
    #[serde(default)]
    message: String,
}

impl ApiServerSource {
    /// Resolves credentials and builds the shared client.
    pub fn new(cfg: &Cluster) -> Result<Self, ConfigurationError> {
        Self::with_credentials(Credentials::resolve(cfg)?, cfg.timeout())
    }

    /// Builds a source from already resolved credentials.
    pub fn with_credentials(
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, ConfigurationError> {
        let pods_uri = pods_uri(&credentials.api_server)?;
        let client = create_client(credentials.trust)?;

        Ok(Self {
            client,
            pods_uri,
            token: credentials.token,
            timeout,
        })
    }

    /// Returns the URI queried on each fetch.
    pub fn pods_uri(&self) -> &Uri {
        &self.pods_uri
    }

    async fn build_request(&self) -> Result<Request<BoxBody<Bytes, hyper::Error>>, FetchError> {
        let mut builder = Request::builder()
            .method(Method::GET)
            .uri(self.pods_uri.clone())
            .header(ACCEPT, "application/json");

        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, token.header().await?);
        }

        let empty: BoxBody<Bytes, hyper::Error> = Empty::<Bytes>::new()
            .map_err(|never: std::convert::Infallible| match never {})
            .boxed();

        builder.body(empty).map_err(|source| FetchError::Request {
            uri: self.pods_uri.to_string(),
            source,
        })
    }

    async fn fetch(&self) -> Result<(u16, Bytes), FetchError> {
        let uri = self.pods_uri.to_string();
        let req = self.build_request().await?;

        let response = self.client.request(req).await.map_err(|source| {
            error!(
                component = "cluster",
                event = "request_failed",
                uri = %uri,
                error = %source,
                error_debug = ?source,
                "API server request failed"
            );
            FetchError::Transport {
                uri: uri.clone(),
                source,
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|source| FetchError::Body {
                uri: uri.clone(),
                source,
            })?
            .to_bytes();

        Ok((status, body))
    }
}

#[async_trait::async_trait]
impl ClusterSource for ApiServerSource {
    async fn list_workload_instances(&self) -> Result<Vec<WorkloadInstanceRecord>, FetchError> {
        let (status, body) = match timeout(self.timeout, self.fetch()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    component = "cluster",
                    event = "request_timeout",
                    uri = %self.pods_uri,
                    timeout = ?self.timeout,
                    "API server request timed out"
                );
                return Err(FetchError::Timeout {
                    uri: self.pods_uri.to_string(),
                    timeout: self.timeout,
                });
            }
        };

        if !(200..300).contains(&status) {
            return Err(FetchError::Status {
                status,
                message: status_message(&body),
            });
        }

        let records = PodList::from_slice(&body)
            .map_err(FetchError::Decode)?
            .into_records();

        debug!(
            component = "cluster",
            event = "pods_listed",
            count = records.len(),
            bytes = body.len(),
            "pods listed"
        );

        Ok(records)
    }
}

/// Joins the API server base address (which may carry a path prefix) with
/// the pod listing path.
pub(crate) fn pods_uri(api_server: &Uri) -> Result<Uri, ConfigurationError> {
    let base = api_server.to_string();
    let addr = format!("{}{}", base.trim_end_matches('/'), PODS_PATH);
    addr.parse()
        .map_err(|source| ConfigurationError::InvalidApiServer { addr, source })
}

/// Extracts a readable message from an error response: the `message` of a
/// `Status` document when present, otherwise a bounded excerpt of the body.
pub(crate) fn status_message(body: &[u8]) -> String {
    if let Ok(status) = serde_json::from_slice::<ApiStatus>(body) {
        if !status.message.is_empty() {
            return status.message;
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return "empty response body".to_string();
    }
    match text.char_indices().nth(MAX_ERROR_MESSAGE_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
