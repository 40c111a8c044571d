//! `recommend-journals` handler.

use super::{FunctionRequest, FunctionResponse, Functions};
use crate::error::AppError;
use crate::services::{RateDecision, validate_request};

impl Functions {
    /// Validate, rate limit and answer one recommendation call.
    ///
    /// Status codes: 200, 400 (validation), 402 (upstream quota), 429 (local
    /// or upstream rate limit), 500 (anything else), 503 (no credential).
    pub async fn recommend_journals(&self, request: &FunctionRequest) -> FunctionResponse {
        if request.is_preflight() {
            return FunctionResponse::preflight();
        }

        let client_ip = request.client_ip();
        if let RateDecision::Limited { retry_after } = self.limiter.hit(&client_ip).await {
            log::warn!(
                "Rate limit exceeded for IP: {}... (resets in {}s)",
                client_ip.chars().take(10).collect::<String>(),
                retry_after.num_seconds()
            );
            return FunctionResponse::error(429, &self.messages.rate_limited);
        }

        let query = match validate_request(&request.body, &self.recommend_config, &self.messages) {
            Ok(query) => query,
            Err(AppError::Validation(message)) => return FunctionResponse::error(400, message),
            Err(e) => {
                log::error!("Error in recommend-journals: {}", e);
                return FunctionResponse::error(500, &self.messages.generic_failure);
            }
        };

        let Some(recommender) = &self.recommender else {
            log::error!("Inference credential is not configured");
            return FunctionResponse::error(503, &self.messages.service_unavailable);
        };

        match recommender.recommend(&query).await {
            Ok(response) => FunctionResponse::json(200, &response),
            Err(e) => match e.upstream_status() {
                Some(429) => FunctionResponse::error(429, &self.messages.upstream_rate_limited),
                Some(402) => FunctionResponse::error(402, &self.messages.quota_exhausted),
                _ => {
                    log::error!("Error in recommend-journals: {}", e);
                    FunctionResponse::error(500, &self.messages.generic_failure)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::super::test_support::{Harness, harness};
    use super::*;
    use crate::inference::{MockGateway, MockReply};
    use crate::models::Config;
    use crate::services::FixedWindowLimiter;
    use crate::storage::MemoryStore;

    const REPLY: &str = r#"Tentu! {"analysis":"Topik ini membahas UMKM.","recommendations":[
        {"id":"1","title":"Digitalisasi UMKM","authors":["Ayu"],"abstract":"...","year":2023,
         "source":"garuda","language":"id","researchType":"kualitatif","relevanceScore":88}]}"#;

    fn body(title: &str) -> String {
        serde_json::json!({ "thesisTitle": title, "researchType": "kualitatif" }).to_string()
    }

    async fn call(h: &Harness, body: &str) -> FunctionResponse {
        h.functions
            .recommend_journals(&FunctionRequest::post(body).with_header("x-forwarded-for", "1.2.3.4"))
            .await
    }

    fn error_of(response: &FunctionResponse) -> String {
        response.json_body().unwrap()["error"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_success() {
        let h = harness(MockGateway::text(REPLY));
        let response = call(&h, &body("Digitalisasi UMKM di Jawa Barat")).await;

        assert_eq!(response.status, 200);
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        let json = response.json_body().unwrap();
        assert_eq!(json["analysis"], "Topik ini membahas UMKM.");
        assert_eq!(json["recommendations"][0]["relevanceScore"], 88);
        assert_eq!(json["recommendations"][0]["source"], "garuda");
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_returned_as_analysis() {
        let h = harness(MockGateway::text("Maaf, coba lagi."));
        let response = call(&h, &body("Judul")).await;
        assert_eq!(response.status, 200);
        let json = response.json_body().unwrap();
        assert_eq!(json["analysis"], "Maaf, coba lagi.");
        assert_eq!(json["recommendations"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_validation_statuses() {
        let h = harness(MockGateway::text(REPLY));

        let too_long = call(&h, &body(&"x".repeat(501))).await;
        assert_eq!(too_long.status, 400);
        assert_eq!(error_of(&too_long), "Judul skripsi maksimal 500 karakter");

        let blank = call(&h, &body("   ")).await;
        assert_eq!(blank.status, 400);
        assert_eq!(error_of(&blank), "Judul skripsi tidak boleh kosong");

        let missing = call(&h, "{}").await;
        assert_eq!(error_of(&missing), "Judul skripsi diperlukan");

        let malformed = call(&h, "{not json").await;
        assert_eq!(malformed.status, 400);

        assert_eq!(h.gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_script_tag_is_sanitized_and_proceeds() {
        let h = harness(MockGateway::text(REPLY));
        let response = call(&h, &body("<script>")).await;
        assert_eq!(response.status, 200);

        let prompt = &h.gateway.requests()[0].messages[1].content;
        assert!(prompt.contains("Judul Skripsi: \"script\""));
    }

    #[tokio::test]
    async fn test_upstream_status_mapping() {
        for (upstream, expected, message) in [
            (429, 429, "Terlalu banyak permintaan, coba lagi nanti"),
            (402, 402, "Kuota AI habis, silakan coba lagi nanti"),
            (500, 500, "Terjadi kesalahan, silakan coba lagi"),
            (401, 500, "Terjadi kesalahan, silakan coba lagi"),
        ] {
            let h = harness(MockGateway::status(upstream));
            let response = call(&h, &body("Judul")).await;
            assert_eq!(response.status, expected, "upstream {upstream}");
            assert_eq!(error_of(&response), message);
        }
    }

    #[tokio::test]
    async fn test_empty_completion_is_generic_500() {
        let h = harness(MockGateway::new(MockReply::Empty));
        let response = call(&h, &body("Judul")).await;
        assert_eq!(response.status, 500);
        assert_eq!(error_of(&response), "Terjadi kesalahan, silakan coba lagi");
    }

    #[tokio::test]
    async fn test_missing_credential_is_503() {
        let config = Config::default();
        let functions = Functions::new(
            &config,
            Arc::new(FixedWindowLimiter::from_config(&config.rate_limit)),
            None,
            Arc::new(MemoryStore::new("http://x")),
        );
        let response = functions
            .recommend_journals(&FunctionRequest::post(body("Judul")))
            .await;
        assert_eq!(response.status, 503);
        assert_eq!(error_of(&response), "Layanan tidak tersedia");
    }

    #[tokio::test]
    async fn test_rate_limit_window() {
        let h = harness(MockGateway::text(REPLY));
        for _ in 0..10 {
            assert_eq!(call(&h, &body("Judul")).await.status, 200);
        }

        let limited = call(&h, &body("Judul")).await;
        assert_eq!(limited.status, 429);
        assert_eq!(
            error_of(&limited),
            "Terlalu banyak permintaan. Coba lagi dalam 1 menit."
        );
        assert_eq!(h.gateway.call_count(), 10);

        // Another client is unaffected.
        let other = h
            .functions
            .recommend_journals(&FunctionRequest::post(body("Judul")).with_header("cf-connecting-ip", "5.6.7.8"))
            .await;
        assert_eq!(other.status, 200);

        h.clock.advance(Duration::seconds(61));
        assert_eq!(call(&h, &body("Judul")).await.status, 200);
    }

    #[tokio::test]
    async fn test_rate_limit_applies_before_validation() {
        let h = harness(MockGateway::text(REPLY));
        for _ in 0..10 {
            assert_eq!(call(&h, "{}").await.status, 400);
        }
        assert_eq!(call(&h, "{}").await.status, 429);
    }
}
