//! Orders hosts by load.

use std::cmp::Ordering;

use crate::model::{HostLoadEntry, HostLoads, RankedHostList};

/// Compares two entries: higher instance count first, then ascending host
/// identifier. Host identifiers are unique, so this is a total order.
fn by_load(a: &HostLoadEntry, b: &HostLoadEntry) -> Ordering {
    b.instance_count
        .cmp(&a.instance_count)
        .then_with(|| a.host_identifier.cmp(&b.host_identifier))
}

/// Returns every host with its count, most loaded first.
pub fn rank_entries(loads: &HostLoads) -> Vec<HostLoadEntry> {
    let mut entries: Vec<HostLoadEntry> = loads
        .iter()
        .map(|(host, count)| HostLoadEntry::new(host.as_str(), *count))
        .collect();
    entries.sort_unstable_by(by_load);
    entries
}

/// Returns host identifiers ordered from most to least loaded.
///
/// Ties on the instance count are broken by ascending identifier, which
/// makes the output a pure function of the input map.
pub fn rank(loads: &HostLoads) -> RankedHostList {
    rank_entries(loads)
        .into_iter()
        .map(|entry| entry.host_identifier)
        .collect()
}
