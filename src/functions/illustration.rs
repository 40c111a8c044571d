//! `generate-illustration` handler.

use super::{FunctionRequest, FunctionResponse, Functions};
use crate::error::AppError;
use crate::models::IllustrationResponse;

impl Functions {
    /// Return the shared hero illustration URL, generating it on first use.
    ///
    /// The request body is ignored. Failures answer 500; only gateway
    /// statuses and messages written for clients are passed through.
    pub async fn generate_illustration(&self, request: &FunctionRequest) -> FunctionResponse {
        if request.is_preflight() {
            return FunctionResponse::preflight();
        }

        match self.illustrations.get_or_generate().await {
            Ok(image_url) => FunctionResponse::json(200, &IllustrationResponse { image_url }),
            Err(e) => {
                log::error!("Error in generate-illustration: {}", e);
                FunctionResponse::error(500, self.illustration_error(&e))
            }
        }
    }

    fn illustration_error(&self, error: &AppError) -> String {
        match error {
            AppError::Upstream { status, .. } => format!("AI Gateway error: {status}"),
            AppError::EmptyCompletion(message)
            | AppError::Config(message)
            | AppError::Upload(message) => message.clone(),
            _ => self.messages.illustration_failed.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::harness;
    use super::*;
    use std::sync::Arc;

    use crate::inference::{InferenceGateway, MockGateway, MockReply};
    use crate::models::{Config, Messages, RateLimitConfig};
    use crate::services::FixedWindowLimiter;
    use crate::storage::{LocalStorage, MemoryStore, ObjectStore};

    #[tokio::test]
    async fn test_generate_then_reuse() {
        let h = harness(MockGateway::new(MockReply::Image(
            "data:image/png;base64,iVBORw0KGgo=".into(),
        )));

        let first = h.functions.generate_illustration(&FunctionRequest::post("")).await;
        assert_eq!(first.status, 200);
        let url = first.json_body().unwrap()["imageUrl"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(url.starts_with("https://cdn.test/illustrations/hero-illustration-"));
        assert!(url.ends_with(".png"));

        let second = h.functions.generate_illustration(&FunctionRequest::post("")).await;
        assert_eq!(second.json_body().unwrap()["imageUrl"], url.as_str());
        assert_eq!(h.gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_seeded_state_returns_existing_url() {
        let h = harness(MockGateway::status(500));
        h.store
            .upload("hero-illustration-1.png", vec![0], "image/png")
            .await
            .unwrap();

        let response = h.functions.generate_illustration(&FunctionRequest::post("")).await;
        assert_eq!(response.status, 200);
        assert_eq!(
            response.json_body().unwrap()["imageUrl"],
            "https://cdn.test/illustrations/hero-illustration-1.png"
        );
        assert_eq!(h.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_is_500_with_message() {
        let h = harness(MockGateway::status(502));
        let response = h.functions.generate_illustration(&FunctionRequest::post("")).await;
        assert_eq!(response.status, 500);
        assert_eq!(response.json_body().unwrap()["error"], "AI Gateway error: 502");
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
    }

    #[tokio::test]
    async fn test_upload_failure_keeps_detail_server_side() {
        let gateway = Arc::new(MockGateway::new(MockReply::Image(
            "data:image/png;base64,iVBORw0KGgo=".into(),
        )));
        let functions = Functions::new(
            &Config::default(),
            Arc::new(FixedWindowLimiter::from_config(&RateLimitConfig::default())),
            Some(gateway as Arc<dyn InferenceGateway>),
            Arc::new(MemoryStore::failing("https://cdn.test/i")),
        );

        let response = functions.generate_illustration(&FunctionRequest::post("")).await;
        assert_eq!(response.status, 500);
        assert_eq!(response.json_body().unwrap()["error"], "Failed to upload image");
    }

    #[tokio::test]
    async fn test_storage_io_error_is_not_exposed() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();
        let store = LocalStorage::new(file.join("illustrations"), "https://cdn.test/i");

        let functions = Functions::new(
            &Config::default(),
            Arc::new(FixedWindowLimiter::from_config(&RateLimitConfig::default())),
            Some(Arc::new(MockGateway::status(500)) as Arc<dyn InferenceGateway>),
            Arc::new(store),
        );

        let response = functions.generate_illustration(&FunctionRequest::post("")).await;
        assert_eq!(response.status, 500);
        let error = response.json_body().unwrap()["error"].clone();
        assert_eq!(error, Messages::default().illustration_failed.as_str());
        assert!(!error.as_str().unwrap().contains("os error"));
    }

    #[tokio::test]
    async fn test_missing_credential_message() {
        let functions = Functions::new(
            &Config::default(),
            Arc::new(FixedWindowLimiter::from_config(&RateLimitConfig::default())),
            None,
            Arc::new(MemoryStore::new("https://cdn.test/i")),
        );

        let response = functions.generate_illustration(&FunctionRequest::post("")).await;
        assert_eq!(response.status, 500);
        assert_eq!(
            response.json_body().unwrap()["error"],
            "LOVABLE_API_KEY is not configured"
        );
    }
}
