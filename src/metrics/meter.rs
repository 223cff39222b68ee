// Metric name constants
pub const REQUESTS_TOTAL: &str = "noderank_requests_total";
pub const FETCH_ERRORS_TOTAL: &str = "noderank_fetch_errors_total";
pub const PANICS_TOTAL: &str = "noderank_panics_total";
pub const RANKED_HOSTS: &str = "noderank_ranked_hosts";
pub const WORKLOAD_INSTANCES: &str = "noderank_workload_instances";
pub const UNSCHEDULED_INSTANCES: &str = "noderank_unscheduled_instances";
pub const FETCH_DURATION: &str = "noderank_fetch_duration_seconds";

/// Registers descriptions for every service metric.
pub fn describe() {
    metrics::describe_counter!(REQUESTS_TOTAL, metrics::Unit::Count, "Ranking requests handled");
    metrics::describe_counter!(
        FETCH_ERRORS_TOTAL,
        metrics::Unit::Count,
        "Failed workload listings from the cluster API server"
    );
    metrics::describe_counter!(PANICS_TOTAL, metrics::Unit::Count, "Recovered handler panics");
    metrics::describe_gauge!(RANKED_HOSTS, metrics::Unit::Count, "Hosts in the last ranking");
    metrics::describe_gauge!(
        WORKLOAD_INSTANCES,
        metrics::Unit::Count,
        "Workload instances observed by the last fetch"
    );
    metrics::describe_gauge!(
        UNSCHEDULED_INSTANCES,
        metrics::Unit::Count,
        "Workload instances not yet bound to a host in the last fetch"
    );
    metrics::describe_histogram!(
        FETCH_DURATION,
        metrics::Unit::Seconds,
        "Latency of workload listings from the cluster API server"
    );
}

/// Adds handled ranking requests.
pub fn add_requests(value: u64) {
    metrics::counter!(REQUESTS_TOTAL).increment(value);
}

/// Adds fetch errors.
pub fn add_fetch_errors(value: u64) {
    metrics::counter!(FETCH_ERRORS_TOTAL).increment(value);
}

/// Adds panics.
pub fn add_panics(value: u64) {
    metrics::counter!(PANICS_TOTAL).increment(value);
}

/// Sets the size of the last ranking.
pub fn set_ranked_hosts(count: usize) {
    metrics::gauge!(RANKED_HOSTS).set(count as f64);
}

/// Sets the number of workload instances seen by the last fetch.
pub fn set_workload_instances(total: usize, unscheduled: u64) {
    metrics::gauge!(WORKLOAD_INSTANCES).set(total as f64);
    metrics::gauge!(UNSCHEDULED_INSTANCES).set(unscheduled as f64);
}

/// Records a fetch latency.
pub fn observe_fetch_duration(seconds: f64) {
    metrics::histogram!(FETCH_DURATION).record(seconds);
}
