//! The two remote functions, independent of the hosting transport.
//!
//! `recommend-journals` and `generate-illustration` take a
//! [`FunctionRequest`] and always produce a [`FunctionResponse`]; errors
//! never escape to the transport. The axum server and the Lambda adapter
//! only translate their native request types.

mod illustration;
mod recommend;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::inference::{GatewayClient, InferenceGateway};
use crate::models::{Config, ErrorBody, Messages, RecommendConfig};
use crate::services::{FixedWindowLimiter, IllustrationService, RateLimitStore, Recommender};
use crate::storage::{self, ObjectStore};

pub const RECOMMEND_JOURNALS: &str = "recommend-journals";
pub const GENERATE_ILLUSTRATION: &str = "generate-illustration";

/// Headers attached to every response.
pub const CORS_HEADERS: [(&str, &str); 2] = [
    ("Access-Control-Allow-Origin", "*"),
    (
        "Access-Control-Allow-Headers",
        "authorization, x-client-info, apikey, content-type",
    ),
];

/// An incoming call.
#[derive(Debug, Clone, Default)]
pub struct FunctionRequest {
    pub method: String,
    /// Keys are lowercased
    headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl FunctionRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            ..Default::default()
        }
    }

    pub fn post(body: impl Into<Vec<u8>>) -> Self {
        Self::new("POST").with_body(body)
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    /// Add a header. Repeated names are joined with `", "` in arrival order.
    pub fn insert_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        self.headers
            .entry(name.to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_preflight(&self) -> bool {
        self.method.eq_ignore_ascii_case("OPTIONS")
    }

    /// Client identifier used for rate limiting.
    ///
    /// First `x-forwarded-for` entry, else `cf-connecting-ip`, else `"unknown"`.
    pub fn client_ip(&self) -> String {
        self.header("x-forwarded-for")
            .and_then(|list| list.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .or_else(|| {
                self.header("cf-connecting-ip")
                    .map(str::trim)
                    .filter(|ip| !ip.is_empty())
            })
            .unwrap_or("unknown")
            .to_string()
    }
}

/// A finished reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Empty for preflight replies
    pub body: String,
}

impl FunctionResponse {
    fn with_cors(status: u16) -> Self {
        Self {
            status,
            headers: CORS_HEADERS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: String::new(),
        }
    }

    /// Empty 200 answering a CORS preflight.
    pub fn preflight() -> Self {
        Self::with_cors(200)
    }

    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        let mut response = Self::with_cors(status);
        response
            .headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        match serde_json::to_string(value) {
            Ok(body) => response.body = body,
            Err(e) => {
                log::error!("Failed to serialize response: {}", e);
                response.status = 500;
                response.body = r#"{"error":"internal error"}"#.to_string();
            }
        }
        response
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, &ErrorBody::new(message))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parsed JSON body, if there is one.
    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Shared state of both functions.
pub struct Functions {
    messages: Messages,
    recommend_config: RecommendConfig,
    limiter: Arc<dyn RateLimitStore>,
    recommender: Option<Recommender>,
    illustrations: IllustrationService,
}

impl Functions {
    /// Wire the functions from explicit collaborators.
    ///
    /// Without a gateway, recommendations answer 503 and illustrations can
    /// only be served from storage.
    pub fn new(
        config: &Config,
        limiter: Arc<dyn RateLimitStore>,
        gateway: Option<Arc<dyn InferenceGateway>>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        let recommender = gateway
            .clone()
            .map(|gateway| Recommender::new(gateway, &config.gateway, &config.recommend));
        let illustrations =
            IllustrationService::new(store, gateway, &config.gateway, &config.illustration);

        Self {
            messages: config.messages.clone(),
            recommend_config: config.recommend.clone(),
            limiter,
            recommender,
            illustrations,
        }
    }

    /// Wire the functions for production: HTTP gateway with the credential
    /// from the environment, configured storage, in-memory rate limiter.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let gateway = GatewayClient::from_env(&config.gateway)?
            .map(|client| Arc::new(client) as Arc<dyn InferenceGateway>);
        let store = storage::from_config(&config.storage).await?;
        let limiter = Arc::new(FixedWindowLimiter::from_config(&config.rate_limit));
        Ok(Self::new(config, limiter, gateway, store))
    }

    /// Route a call by function name.
    pub async fn dispatch(&self, name: &str, request: &FunctionRequest) -> FunctionResponse {
        match name {
            RECOMMEND_JOURNALS => self.recommend_journals(request).await,
            GENERATE_ILLUSTRATION => self.generate_illustration(request).await,
            other => {
                log::warn!("Unknown function: {}", other);
                FunctionResponse::error(404, "Not found")
            }
        }
    }
}
