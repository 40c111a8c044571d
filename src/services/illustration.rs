//! Hero illustration: fetch the shared asset or generate it once.
//!
//! Concurrent first-time calls may each generate and upload; every upload
//! is an upsert and later calls converge on the lexicographically first
//! stored name.

use std::sync::{Arc, LazyLock};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

use crate::error::{AppError, Result};
use crate::inference::{ChatRequest, InferenceGateway};
use crate::models::{GatewayConfig, IllustrationConfig};
use crate::services::rate_limit::{Clock, SystemClock};
use crate::storage::ObjectStore;

static DATA_URL_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^data:image/\w+;base64,").ok());

/// Decode an image returned as a `data:image/<kind>;base64,` URL.
///
/// Input without the prefix is decoded as bare base64.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let payload = match DATA_URL_PREFIX.as_ref().and_then(|re| re.find(data_url)) {
        Some(prefix) => &data_url[prefix.end()..],
        None => data_url,
    };
    Ok(STANDARD.decode(payload.trim())?)
}

/// Generates and stores the hero illustration.
pub struct IllustrationService {
    store: Arc<dyn ObjectStore>,
    gateway: Option<Arc<dyn InferenceGateway>>,
    clock: Arc<dyn Clock>,
    model: String,
    credential_env: String,
    config: IllustrationConfig,
}

impl IllustrationService {
    /// `gateway` may be absent; existing assets are still served.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        gateway: Option<Arc<dyn InferenceGateway>>,
        gateway_config: &GatewayConfig,
        config: &IllustrationConfig,
    ) -> Self {
        Self {
            store,
            gateway,
            clock: Arc::new(SystemClock),
            model: gateway_config.image_model.clone(),
            credential_env: gateway_config.api_key_env.clone(),
            config: config.clone(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Public URL of the existing asset, if one was stored before.
    pub async fn existing(&self) -> Result<Option<String>> {
        let names = self.store.list(&self.config.name_prefix).await?;
        Ok(names.first().map(|name| self.store.public_url(name)))
    }

    /// Return the stored illustration URL, generating the image on first use.
    pub async fn get_or_generate(&self) -> Result<String> {
        if let Some(url) = self.existing().await? {
            log::info!("Returning existing illustration: {}", url);
            return Ok(url);
        }

        let gateway = self
            .gateway
            .as_ref()
            .ok_or_else(|| AppError::config(format!("{} is not configured", self.credential_env)))?;

        log::info!("Generating new illustration with {}", self.model);
        let request = ChatRequest::new(&self.model)
            .user(&self.config.prompt)
            .modalities(["image", "text"]);
        let completion = gateway.complete(&request).await?;
        log::info!("AI response received");

        let data_url = completion.first_image_url().ok_or_else(|| {
            log::error!("No image in response: {:?}", completion);
            AppError::EmptyCompletion("No image generated from AI".into())
        })?;
        let bytes = decode_data_url(data_url)?;

        let name = self.file_name();
        self.store
            .upload(&name, bytes, "image/png")
            .await
            .map_err(|e| {
                log::error!("Upload error for {}: {}", name, e);
                AppError::Upload("Failed to upload image".into())
            })?;

        let url = self.store.public_url(&name);
        log::info!("Image uploaded successfully: {}", url);
        Ok(url)
    }

    fn file_name(&self) -> String {
        format!(
            "{}-{}.png",
            self.config.name_prefix,
            self.clock.now().timestamp_millis()
        )
    }
}
