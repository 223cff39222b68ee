//! Per-request ranking pipeline: fetch, aggregate, rank.

use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::{aggregate, rank};
use crate::cluster::{ClusterSource, FetchError};
use crate::config::Ranking;
use crate::metrics;
use crate::model::RankedHostList;

/// Computes a fresh host ranking on every call. Holds no cluster state
/// between calls, so one instance serves any number of concurrent requests.
pub struct LoadRanker {
    source: Arc<dyn ClusterSource>,
    include_unscheduled: bool,
}

impl LoadRanker {
    pub fn new(source: Arc<dyn ClusterSource>, cfg: &Ranking) -> Self {
        Self {
            source,
            include_unscheduled: cfg.include_unscheduled,
        }
    }

    /// Lists workload instances and ranks hosts by instance count.
    ///
    /// Ranking only happens after a complete fetch; a failed fetch is
    /// returned as is and nothing partial is produced.
    pub async fn rank_hosts(&self) -> Result<RankedHostList, FetchError> {
        let started = Instant::now();
        let fetched = self.source.list_workload_instances().await;
        metrics::observe_fetch_duration(started.elapsed().as_secs_f64());

        let records = match fetched {
            Ok(records) => records,
            Err(err) => {
                metrics::add_fetch_errors(1);
                return Err(err);
            }
        };

        let mut loads = aggregate(&records);

        // Pending instances are grouped under the empty host identifier.
        let unscheduled = loads.get("").copied().unwrap_or(0);
        if unscheduled > 0 && !self.include_unscheduled {
            loads.remove("");
        }
        if unscheduled > 0 {
            debug!(
                component = "ranking",
                event = "unscheduled_instances",
                unscheduled = unscheduled,
                ranked = self.include_unscheduled,
                "workload instances without a host"
            );
        }

        let ranked = rank(&loads);

        metrics::set_workload_instances(records.len(), unscheduled);
        metrics::set_ranked_hosts(ranked.len());

        debug!(
            component = "ranking",
            event = "ranked",
            instances = records.len(),
            hosts = ranked.len(),
            busiest = ranked.first().map(String::as_str).unwrap_or(""),
            elapsed = ?started.elapsed(),
            "hosts ranked"
        );

        Ok(ranked)
    }
}
