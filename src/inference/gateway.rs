//! HTTP client for the inference gateway.

use async_trait::async_trait;
use url::Url;

use super::{ChatCompletion, ChatRequest, InferenceGateway};
use crate::error::{AppError, Result};
use crate::models::GatewayConfig;
use crate::utils::http::{create_async_client, endpoint};

/// Bearer-authenticated chat completions client.
#[derive(Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    completions_url: Url,
    api_key: String,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("completions_url", &self.completions_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GatewayClient {
    pub fn new(config: &GatewayConfig, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: create_async_client(&config.user_agent, config.timeout_secs)?,
            completions_url: endpoint(&config.base_url, "chat/completions")?,
            api_key: api_key.into(),
        })
    }

    /// Build a client with the credential from the environment.
    ///
    /// Returns `Ok(None)` when no credential is configured; callers answer
    /// 503 in that case instead of failing at startup.
    pub fn from_env(config: &GatewayConfig) -> Result<Option<Self>> {
        match config.api_key_from_env() {
            Some(key) => Self::new(config, key).map(Some),
            None => {
                log::warn!("{} is not set, inference is disabled", config.api_key_env);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl InferenceGateway for GatewayClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        log::debug!(
            "POST {} model={} messages={}",
            self.completions_url,
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(self.completions_url.clone())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("AI gateway error: {} {}", status.as_u16(), body);
            return Err(AppError::upstream(status.as_u16(), body));
        }

        Ok(response.json::<ChatCompletion>().await?)
    }
}
