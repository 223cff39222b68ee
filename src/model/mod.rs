// Package model provides the workload and host-load models.

pub mod load;
pub mod workload;


// Re-export main types
pub use load::{HostLoadEntry, HostLoads, RankedHostList};
pub use workload::{PodList, WorkloadInstanceRecord};
