// Common HTTP helpers for integration tests.

use std::time::Duration;

/// Performs a request and returns status, content type and body bytes.
pub async fn do_request(
    method: &str,
    url: &str,
) -> Result<(u16, Option<String>, Vec<u8>), reqwest::Error> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let method = reqwest::Method::from_bytes(method.as_bytes()).expect("valid method");
    let resp = client.request(method, url).send().await?;

    let status = resp.status().as_u16();
    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = resp.bytes().await?.to_vec();

    Ok((status, content_type, body))
}

/// Performs a request and decodes a JSON body.
pub async fn do_json(method: &str, url: &str) -> (u16, serde_json::Value) {
    let (status, content_type, body) = do_request(method, url)
        .await
        .unwrap_or_else(|e| panic!("{} {} failed: {}", method, url, e));

    assert_eq!(
        content_type.as_deref(),
        Some("application/json"),
        "{} {} must answer with JSON",
        method,
        url
    );
    let value = serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("{} {} returned invalid JSON: {}", method, url, e));
    (status, value)
}

/// Decodes a ranking response into host identifiers.
pub fn hosts(value: &serde_json::Value) -> Vec<String> {
    serde_json::from_value(value.clone()).expect("ranking must be an array of strings")
}
