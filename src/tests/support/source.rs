// In-memory cluster sources for tests that do not need a network.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::cluster::{ClusterSource, FetchError};
use crate::model::WorkloadInstanceRecord;

/// Serves a fixed, replaceable set of workload instances.
pub struct StaticSource {
    records: Mutex<Vec<WorkloadInstanceRecord>>,
    calls: AtomicUsize,
}

impl StaticSource {
    /// One instance per entry, placed on the given host ("" = unscheduled).
    pub fn with_hosts(hosts: &[&str]) -> Self {
        Self {
            records: Mutex::new(records(hosts)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Replaces the cluster state seen by subsequent fetches.
    pub fn set_hosts(&self, hosts: &[&str]) {
        *self.records.lock() = records(hosts);
    }

    /// Number of fetches served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ClusterSource for StaticSource {
    async fn list_workload_instances(&self) -> Result<Vec<WorkloadInstanceRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().clone())
    }
}

/// Always fails with the configured API status.
pub struct FailingSource {
    status: u16,
    message: String,
}

impl FailingSource {
    pub fn forbidden() -> Self {
        Self {
            status: 403,
            message: "pods is forbidden: User \"system:anonymous\" cannot list resource \"pods\""
                .to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ClusterSource for FailingSource {
    async fn list_workload_instances(&self) -> Result<Vec<WorkloadInstanceRecord>, FetchError> {
        Err(FetchError::Status {
            status: self.status,
            message: self.message.clone(),
        })
    }
}

fn records(hosts: &[&str]) -> Vec<WorkloadInstanceRecord> {
    hosts
        .iter()
        .enumerate()
        .map(|(i, host)| {
            let mut record = WorkloadInstanceRecord::on_host(*host);
            record.name = format!("pod-{}", i);
            record.namespace = "default".to_string();
            record
        })
        .collect()
}
