//! Host load models produced by the aggregation and ranking steps.

use std::collections::HashMap;

/// Instance count per host identifier. Iteration order carries no meaning.
pub type HostLoads = HashMap<String, u64>;

/// Host identifiers ordered from most to least loaded.
pub type RankedHostList = Vec<String>;

/// One host's instance count within a single computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLoadEntry {
    pub host_identifier: String,
    pub instance_count: u64,
}

impl HostLoadEntry {
    pub fn new(host_identifier: impl Into<String>, instance_count: u64) -> Self {
        Self {
            host_identifier: host_identifier.into(),
            instance_count,
        }
    }
}
