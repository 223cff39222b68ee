//! Router-level tests for the rank controller.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use super::RankController;
use crate::config::Ranking;
use crate::http::Controller;
use crate::ranking::LoadRanker;
use crate::tests::support::{FailingSource, StaticSource};

fn router_with(source: Arc<dyn crate::cluster::ClusterSource>, success_status: u16) -> Router {
    let ranker = Arc::new(LoadRanker::new(source, &Ranking::default()));
    RankController::new(ranker, success_status).add_route(Router::new())
}

async fn call(router: Router, method: &str, uri: &str) -> (StatusCode, Option<String>, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_rank_returns_json_array() {
    let source = Arc::new(StaticSource::with_hosts(&[
        "node-a", "node-b", "node-a", "node-c", "node-a", "node-b",
    ]));
    let (status, content_type, body) = call(router_with(source, 200), "GET", "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body, serde_json::json!(["node-a", "node-b", "node-c"]));
}

#[tokio::test]
async fn test_rank_empty_cluster_is_empty_array() {
    let source = Arc::new(StaticSource::with_hosts(&[]));
    let (status, _, body) = call(router_with(source, 200), "GET", "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_rank_with_legacy_created_status() {
    let source = Arc::new(StaticSource::with_hosts(&["node-x", "node-y"]));
    let (status, _, body) = call(router_with(source, 201), "GET", "/").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, serde_json::json!(["node-x", "node-y"]));
}

#[tokio::test]
async fn test_rank_invalid_success_status_falls_back_to_ok() {
    let source = Arc::new(StaticSource::with_hosts(&["node-x"]));
    let (status, _, _) = call(router_with(source, 503), "GET", "/").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rank_ignores_query_path_and_method() {
    let source = Arc::new(StaticSource::with_hosts(&["node-b", "node-a", "node-b"]));
    let router = router_with(source.clone(), 200);

    for (method, uri) in [("GET", "/?limit=1"), ("POST", "/"), ("GET", "/nodes/anything")] {
        let (status, _, body) = call(router.clone(), method, uri).await;
        assert_eq!(status, StatusCode::OK, "{} {}", method, uri);
        assert_eq!(body, serde_json::json!(["node-b", "node-a"]), "{} {}", method, uri);
    }
    assert_eq!(source.calls(), 3);
}

#[tokio::test]
async fn test_rank_fetch_failure_is_json_500() {
    let (status, content_type, body) =
        call(router_with(Arc::new(FailingSource::forbidden()), 200), "GET", "/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let message = body["error"].as_str().expect("error message must be a string");
    assert!(message.contains("403"), "got: {}", message);
    assert!(message.contains("forbidden"), "got: {}", message);
}
