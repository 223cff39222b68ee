//! Tests for panic recovery.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use super::{panics_counter, Middleware, PanicRecoverMiddleware};

async fn boom() -> &'static str {
    panic!("boom")
}

#[tokio::test]
async fn test_panic_becomes_json_500() {
    let router = Router::new()
        .route("/boom", get(boom))
        .route("/ok", get(|| async { "ok" }));
    let router = PanicRecoverMiddleware::new().apply(router);
    let before = panics_counter();

    let response = router
        .clone()
        .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "internal server error");
    assert!(panics_counter() > before);

    // The router keeps serving after a panic.
    let response = router
        .oneshot(Request::get("/ok").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
