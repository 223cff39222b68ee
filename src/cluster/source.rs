// Package cluster provides the ClusterSource interface.

use crate::model::WorkloadInstanceRecord;

use super::FetchError;

/// ClusterSource lists the workload instances currently known to the cluster.
#[async_trait::async_trait]
pub trait ClusterSource: Send + Sync {
    /// Returns every workload instance across all namespaces, without filtering.
    async fn list_workload_instances(&self) -> Result<Vec<WorkloadInstanceRecord>, FetchError>;
}
