// Liveness probe and metrics endpoints.

use crate::support::{do_json, do_request, FakeApiServer, TestService};

#[tokio::test]
async fn test_probe_is_alive() {
    let cluster = FakeApiServer::start().await;
    let service = TestService::start(&cluster.url()).await;

    let (status, body) = do_json("GET", &format!("{}/k8s/probe", service.url())).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], 200);
    // The probe never touches the cluster.
    assert_eq!(cluster.hits(), 0);

    service.stop().await;
}

#[tokio::test]
async fn test_probe_ignores_cluster_failures() {
    let cluster = FakeApiServer::start().await;
    cluster.fail_with(403, r#"{"message":"forbidden"}"#);
    let service = TestService::start(&cluster.url()).await;

    let (status, _) = do_json("GET", &service.url()).await;
    assert_eq!(status, 500);

    let (status, _) = do_json("GET", &format!("{}/k8s/probe", service.url())).await;
    assert_eq!(status, 200);

    service.stop().await;
}

#[tokio::test]
async fn test_metrics_are_exposed() {
    let cluster = FakeApiServer::start().await;
    cluster.set_pods(&["node-a", "node-b", "node-a"]);
    let service = TestService::start(&cluster.url()).await;

    let (status, _) = do_json("GET", &service.url()).await;
    assert_eq!(status, 200);

    let (status, content_type, body) = tokio_test::assert_ok!(
        do_request("GET", &format!("{}/metrics", service.url())).await
    );
    assert_eq!(status, 200);
    assert!(content_type.unwrap_or_default().starts_with("text/plain"));
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("noderank_requests_total"), "got: {}", text);

    service.stop().await;
}

#[tokio::test]
async fn test_metrics_route_can_be_disabled() {
    let cluster = FakeApiServer::start().await;
    cluster.set_pods(&["node-a"]);
    let service = TestService::start_with(&cluster.url(), |cfg| {
        if let Some(m) = cfg.noderank.metrics.as_mut() {
            m.enabled = false;
        }
    })
    .await;

    // Without the metrics route, /metrics falls through to the ranking.
    let (status, body) = do_json("GET", &format!("{}/metrics", service.url())).await;
    assert_eq!(status, 200);
    assert_eq!(body, serde_json::json!(["node-a"]));

    service.stop().await;
}
