//! HTTP access to the remote functions.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::functions::{GENERATE_ILLUSTRATION, RECOMMEND_JOURNALS};
use crate::models::{ClientConfig, IllustrationResponse, RecommendRequest, RecommendResponse};
use crate::utils::http::{create_async_client, endpoint};

/// Something that answers recommendation requests.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn recommend(&self, request: &RecommendRequest) -> Result<RecommendResponse>;
}

/// Something that resolves the hero illustration URL.
#[async_trait]
pub trait IllustrationSource: Send + Sync {
    async fn hero_illustration(&self) -> Result<IllustrationResponse>;
}

/// Client of the deployed functions.
#[derive(Debug, Clone)]
pub struct FunctionsClient {
    client: reqwest::Client,
    base_url: String,
}

impl FunctionsClient {
    pub fn new(config: &ClientConfig, user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: create_async_client(user_agent, config.timeout_secs)?,
            base_url: config.functions_url.clone(),
        })
    }

    /// POST `body` to function `name` and decode the reply.
    ///
    /// Any reply carrying an `error` string becomes [`AppError::Remote`],
    /// whatever its status.
    async fn invoke<B, R>(&self, name: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = endpoint(&self.base_url, name)?;
        log::debug!("Invoking {}", url);

        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                return Err(AppError::Remote {
                    status: status.as_u16(),
                    message: format!("HTTP {}", status),
                });
            }
        };

        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Err(AppError::Remote {
                status: status.as_u16(),
                message: message.to_string(),
            });
        }
        if !status.is_success() {
            return Err(AppError::Remote {
                status: status.as_u16(),
                message: format!("HTTP {}", status),
            });
        }

        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl RecommendationSource for FunctionsClient {
    async fn recommend(&self, request: &RecommendRequest) -> Result<RecommendResponse> {
        self.invoke(RECOMMEND_JOURNALS, request).await
    }
}

#[async_trait]
impl IllustrationSource for FunctionsClient {
    async fn hero_illustration(&self) -> Result<IllustrationResponse> {
        self.invoke(GENERATE_ILLUSTRATION, &serde_json::json!({})).await
    }
}
