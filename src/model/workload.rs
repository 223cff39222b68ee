//! Workload instance records as reported by the cluster API server.

use serde::Deserialize;

/// One scheduled unit of work (a pod) observed during a single fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadInstanceRecord {
    /// Name of the node the instance is bound to; empty while pending.
    pub host_identifier: String,
    pub name: String,
    pub namespace: String,
}

impl WorkloadInstanceRecord {
    /// Creates a record bound to the given host.
    pub fn on_host(host: impl Into<String>) -> Self {
        Self {
            host_identifier: host.into(),
            ..Self::default()
        }
    }

    /// Returns true if the instance is not yet bound to any host.
    pub fn is_unscheduled(&self) -> bool {
        self.host_identifier.is_empty()
    }
}

/// `v1.PodList` document, reduced to the fields the ranking needs.
#[derive(Debug, Default, Deserialize)]
pub struct PodList {
    #[serde(default)]
    pub items: Vec<Pod>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pod {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PodSpec,
}

#[derive(Debug, Default, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PodSpec {
    #[serde(rename = "nodeName", default)]
    pub node_name: String,
}

impl PodList {
    /// Decodes a PodList from a JSON body.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    /// Converts the list into workload records, preserving item order.
    pub fn into_records(self) -> Vec<WorkloadInstanceRecord> {
        self.items.into_iter().map(WorkloadInstanceRecord::from).collect()
    }
}

impl From<Pod> for WorkloadInstanceRecord {
    fn from(pod: Pod) -> Self {
        Self {
            host_identifier: pod.spec.node_name,
            name: pod.metadata.name,
            namespace: pod.metadata.namespace,
        }
    }
}
