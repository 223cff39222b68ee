//! Cluster-state source: lists workload instances from the cluster control plane.

pub mod api_server;
pub mod credentials;
pub mod error;
pub mod source;


// Re-export main types
pub use api_server::ApiServerSource;
pub use credentials::{Credentials, TokenSource, TrustAnchors};
pub use error::{ConfigurationError, FetchError};
pub use source::ClusterSource;
