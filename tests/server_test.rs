//! Router-level tests: both functions served through axum.

#![cfg(feature = "server")]

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use owwjurnal::functions::Functions;
use owwjurnal::inference::{InferenceGateway, MockGateway, MockReply};
use owwjurnal::models::Config;
use owwjurnal::server::build_router;
use owwjurnal::services::{FixedWindowLimiter, ManualClock};
use owwjurnal::storage::{MemoryStore, ObjectStore};
use tower::ServiceExt;

const REPLY: &str = r#"Berikut hasilnya:
{"analysis":"Relevan.","recommendations":[{"id":"1","title":"Jurnal A","authors":["A"],
"abstract":"x","year":2023,"source":"garuda","language":"id","relevanceScore":90}]}"#;

struct App {
    router: axum::Router,
    gateway: Arc<MockGateway>,
    store: Arc<MemoryStore>,
}

fn app(gateway: MockGateway) -> App {
    let gateway = Arc::new(gateway);
    let store = Arc::new(MemoryStore::new("https://cdn.test/illustrations"));
    let limiter = Arc::new(FixedWindowLimiter::new(
        10,
        Duration::seconds(60),
        Arc::new(ManualClock::new(Utc::now())),
    ));
    let functions = Functions::new(
        &Config::default(),
        limiter,
        Some(gateway.clone() as Arc<dyn InferenceGateway>),
        store.clone(),
    );
    App {
        router: build_router(Arc::new(functions), None),
        gateway,
        store,
    }
}

fn post(uri: &str, body: &str, ip: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_preflight_is_empty_with_cors() {
    let app = app(MockGateway::text(REPLY));
    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/functions/recommend-journals")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
    assert_eq!(app.gateway.call_count(), 0);
}

#[tokio::test]
async fn test_recommend_success() {
    let app = app(MockGateway::text(REPLY));
    let response = app
        .router
        .oneshot(post(
            "/functions/recommend-journals",
            r#"{"thesisTitle":"Pengaruh media sosial","researchType":"kualitatif"}"#,
            "198.51.100.1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
    let json = json_body(response).await;
    assert_eq!(json["analysis"], "Relevan.");
    assert_eq!(json["recommendations"][0]["relevanceScore"], 90);
}

#[tokio::test]
async fn test_recommend_validation_error() {
    let app = app(MockGateway::text(REPLY));
    let response = app
        .router
        .oneshot(post(
            "/functions/recommend-journals",
            r#"{"thesisTitle":""}"#,
            "198.51.100.2",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Judul skripsi diperlukan");
    assert_eq!(app.gateway.call_count(), 0);
}

#[tokio::test]
async fn test_eleventh_request_is_rate_limited() {
    let app = app(MockGateway::text(REPLY));
    let body = r#"{"thesisTitle":"Judul"}"#;

    for _ in 0..10 {
        let response = app
            .router
            .clone()
            .oneshot(post("/functions/recommend-journals", body, "203.0.113.7"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .router
        .clone()
        .oneshot(post("/functions/recommend-journals", body, "203.0.113.7"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Another client keeps its own window.
    let response = app
        .router
        .oneshot(post("/functions/recommend-journals", body, "203.0.113.8"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upstream_quota_maps_to_402() {
    let app = app(MockGateway::status(402));
    let response = app
        .router
        .oneshot(post(
            "/functions/recommend-journals",
            r#"{"thesisTitle":"Judul"}"#,
            "198.51.100.3",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    assert_eq!(
        json_body(response).await["error"],
        "Kuota AI habis, silakan coba lagi nanti"
    );
}

#[tokio::test]
async fn test_illustration_generated_then_reused() {
    let gateway = MockGateway::text("unused").then(MockReply::Image(
        "data:image/png;base64,iVBORw0KGgo=".into(),
    ));
    let app = app(gateway);

    let first = app
        .router
        .clone()
        .oneshot(post("/functions/generate-illustration", "{}", "198.51.100.4"))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first_url = json_body(first).await["imageUrl"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(first_url.starts_with("https://cdn.test/illustrations/hero-illustration-"));
    assert_eq!(app.store.list("hero-illustration").await.unwrap().len(), 1);

    let second = app
        .router
        .oneshot(post("/functions/generate-illustration", "{}", "198.51.100.4"))
        .await
        .unwrap();
    assert_eq!(json_body(second).await["imageUrl"], first_url.as_str());
    assert_eq!(app.gateway.call_count(), 1);
}

#[tokio::test]
async fn test_unknown_function_is_not_found() {
    let app = app(MockGateway::text(REPLY));
    let response = app
        .router
        .oneshot(post("/functions/nope", "{}", "198.51.100.5"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
