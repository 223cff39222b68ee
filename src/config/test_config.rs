use super::{Api, Cluster, Config, Logs, Metrics, NodeRankBox, Probe, Ranking, Runtime, K8S};
use std::time::Duration;

/// Creates a new test configuration.
///
/// The API server address is left unset; tests point it at a fake server.
pub fn new_test_config() -> Config {
    Config {
        noderank: NodeRankBox {
            env: super::TEST.to_string(),
            logs: Some(Logs {
                level: Some("debug".to_string()),
            }),
            runtime: Some(Runtime { num_cpus: 2 }),
            api: Some(Api {
                name: Some("noderank-test".to_string()),
                host: Some("127.0.0.1".to_string()),
                port: Some("0".to_string()),
                success_status: Some(200),
                request_timeout: Some(Duration::from_secs(10)),
            }),
            cluster: Some(Cluster {
                api_server: None,
                token_file: None,
                ca_file: None,
                timeout: Some(Duration::from_secs(2)),
                token_reload: Some(Duration::from_secs(60)),
            }),
            ranking: Some(Ranking {
                include_unscheduled: false,
            }),
            metrics: Some(Metrics { enabled: true }),
            k8s: Some(K8S {
                probe: Probe {
                    timeout: Some(Duration::from_secs(1)),
                },
            }),
        },
    }
}
