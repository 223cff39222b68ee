//! Groups workload records by the host they run on.

use crate::model::{HostLoads, WorkloadInstanceRecord};

/// Counts records per host identifier.
///
/// Every distinct identifier observed becomes one entry, the empty one
/// (unscheduled instances) included. An empty input yields an empty map.
pub fn aggregate<'a, I>(records: I) -> HostLoads
where
    I: IntoIterator<Item = &'a WorkloadInstanceRecord>,
{
    let mut loads = HostLoads::new();
    for record in records {
        // Avoids an allocation per record once the host is known.
        match loads.get_mut(record.host_identifier.as_str()) {
            Some(count) => *count += 1,
            None => {
                loads.insert(record.host_identifier.clone(), 1);
            }
        }
    }
    loads
}
