//! Integration tests for the inference gateway client.

use owwjurnal::error::AppError;
use owwjurnal::inference::{ChatRequest, GatewayClient, InferenceGateway};
use owwjurnal::models::GatewayConfig;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> GatewayConfig {
    GatewayConfig {
        base_url: format!("{}/v1", server.uri()),
        timeout_secs: 5,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_completion_sends_bearer_and_model() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "test-model",
            "messages": [{ "role": "user", "content": "Halo" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "Hai" } }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GatewayClient::new(&config(&mock_server), "test-key").unwrap();
    let completion = client
        .complete(&ChatRequest::new("test-model").user("Halo"))
        .await
        .unwrap();

    assert_eq!(completion.first_text(), Some("Hai"));
}

#[tokio::test]
async fn test_image_reply_is_parsed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "modalities": ["image", "text"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "",
                    "images": [{
                        "type": "image_url",
                        "image_url": { "url": "data:image/png;base64,iVBORw0KGgo=" }
                    }]
                }
            }]
        })))
        .mount(&mock_server)
        .await;

    let client = GatewayClient::new(&config(&mock_server), "k").unwrap();
    let completion = client
        .complete(
            &ChatRequest::new("image-model")
                .user("draw")
                .modalities(["image", "text"]),
        )
        .await
        .unwrap();

    assert_eq!(completion.first_text(), None);
    assert_eq!(
        completion.first_image_url(),
        Some("data:image/png;base64,iVBORw0KGgo=")
    );
}

#[tokio::test]
async fn test_error_status_becomes_upstream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&mock_server)
        .await;

    let client = GatewayClient::new(&config(&mock_server), "k").unwrap();
    let err = client
        .complete(&ChatRequest::new("m").user("x"))
        .await
        .unwrap_err();

    assert_eq!(err.upstream_status(), Some(429));
    match err {
        AppError::Upstream { message, .. } => assert_eq!(message, "slow down"),
        other => panic!("unexpected error: {other:?}"),
    }
}
