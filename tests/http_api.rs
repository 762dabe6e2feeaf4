//! HTTP API tests driven through the router without binding a socket

mod common;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use common::{model_output, RAGEBAIT_TEXT};
use intentkeeper::server::build_router;
use intentkeeper::{BackendError, InferenceBackend, IntentClassifier, RetryPolicy};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Backend that always returns the same classification
struct FixedBackend {
    output: String,
    healthy: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl InferenceBackend for FixedBackend {
    async fn generate(&self, _prompt: &str) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }

    async fn check_health(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "test-model"
    }
}

fn router(healthy: bool) -> (axum::Router, Arc<FixedBackend>) {
    let backend = Arc::new(FixedBackend {
        output: model_output("ragebait", 0.9, "outrage framing"),
        healthy,
        calls: AtomicUsize::new(0),
    });
    let classifier = IntentClassifier::builder()
        .backend(backend.clone())
        .retry(RetryPolicy::none())
        .build()
        .unwrap();
    (build_router(Arc::new(classifier)), backend)
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_ok() {
    let (app, _) = router(true);
    let (status, body) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["ollama_connected"], true);
    assert_eq!(body["model"], "test-model");
}

#[tokio::test]
async fn test_health_degraded() {
    let (app, _) = router(false);
    let (status, body) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["ollama_connected"], false);
}

#[tokio::test]
async fn test_classify() {
    let (app, backend) = router(true);
    let request = post_json(
        "/classify",
        json!({ "content": RAGEBAIT_TEXT, "source": "twitter" }),
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["intent"], "ragebait");
    assert_eq!(body["action"], "blur");
    assert_eq!(body["reasoning"], "outrage framing");
    let score = body["manipulation_score"].as_f64().unwrap();
    assert!((score - 0.81).abs() < 1e-9);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_classify_rejects_empty_content() {
    let (app, backend) = router(true);
    let (status, body) = send(app, post_json("/classify", json!({ "content": "" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("content"));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_classify_rejects_oversized_content() {
    let (app, _) = router(true);
    let content = "x".repeat(2001);
    let (status, _) = send(app, post_json("/classify", json!({ "content": content }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_classify_accepts_content_at_limit() {
    let (app, _) = router(true);
    let content = "y".repeat(2000);
    let (status, _) = send(app, post_json("/classify", json!({ "content": content }))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_body_gets_detail() {
    let (app, _) = router(true);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/classify")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"content\": "))
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_missing_content_field_gets_detail() {
    let (app, _) = router(true);
    let (status, body) = send(app, post_json("/classify", json!({ "source": "twitter" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("content"));
}

#[tokio::test]
async fn test_batch_missing_items_gets_detail() {
    let (app, _) = router(true);
    let (status, body) = send(app, post_json("/classify/batch", json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_batch_keeps_order() {
    let (app, _) = router(true);
    let request = post_json(
        "/classify/batch",
        json!({ "items": [
            { "content": RAGEBAIT_TEXT },
            { "content": "tiny" },
            { "content": RAGEBAIT_TEXT, "url": "https://example.com/post/1" },
        ]}),
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["intent"], "ragebait");
    assert_eq!(results[1]["intent"], "neutral");
    assert_eq!(results[1]["confidence"], 1.0);
    assert_eq!(results[2]["intent"], "ragebait");
}

#[tokio::test]
async fn test_batch_rejects_too_many_items() {
    let (app, backend) = router(true);
    let items: Vec<Value> = (0..51)
        .map(|i| json!({ "content": format!("item number {i} with enough text") }))
        .collect();
    let (status, _) = send(app, post_json("/classify/batch", json!({ "items": items }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_batch_rejects_invalid_item() {
    let (app, _) = router(true);
    let request = post_json(
        "/classify/batch",
        json!({ "items": [{ "content": RAGEBAIT_TEXT }, { "content": "" }] }),
    );
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().starts_with("items[1]"));
}

#[tokio::test]
async fn test_intents_document() {
    let (app, _) = router(true);
    let (status, body) = send(app, get("/intents")).await;

    assert_eq!(status, StatusCode::OK);
    let intents = body["intents"].as_object().unwrap();
    assert_eq!(intents.len(), 7);
    assert_eq!(intents["ragebait"]["action"], "blur");
    assert_eq!(intents["engagement_bait"]["action"], "hide");
    assert!(body["rules"].is_array());
}

#[tokio::test]
async fn test_cors_allows_extension_origin() {
    let (app, _) = router(true);
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/classify")
        .header(header::ORIGIN, "chrome-extension://abcdefghijklmnop")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "chrome-extension://abcdefghijklmnop"
    );
}

#[tokio::test]
async fn test_cors_ignores_foreign_origin() {
    let (app, _) = router(true);
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
