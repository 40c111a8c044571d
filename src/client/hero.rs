//! Hero illustration loading with a persistent URL cache.

use std::sync::Arc;

use super::api::IllustrationSource;
use super::cache::KeyValueCache;

/// What the landing page should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeroIllustration {
    /// Generated image at this URL
    Remote(String),
    /// Built-in static illustration
    Fallback,
}

pub struct HeroLoader {
    source: Arc<dyn IllustrationSource>,
    cache: Arc<dyn KeyValueCache>,
    cache_key: String,
}

impl HeroLoader {
    pub fn new(
        source: Arc<dyn IllustrationSource>,
        cache: Arc<dyn KeyValueCache>,
        cache_key: impl Into<String>,
    ) -> Self {
        Self {
            source,
            cache,
            cache_key: cache_key.into(),
        }
    }

    /// Resolve the illustration. Never fails: errors fall back.
    ///
    /// A cached URL is returned without touching the network. A freshly
    /// resolved URL is cached.
    pub async fn load(&self) -> HeroIllustration {
        if let Some(url) = self.cache.get(&self.cache_key).await.filter(|u| !u.is_empty()) {
            log::debug!("Using cached illustration {}", url);
            return HeroIllustration::Remote(url);
        }

        match self.source.hero_illustration().await {
            Ok(response) if !response.image_url.is_empty() => {
                log::info!("Illustration loaded: {}", response.image_url);
                if let Err(e) = self.cache.set(&self.cache_key, &response.image_url).await {
                    log::warn!("Failed to cache illustration URL: {}", e);
                }
                HeroIllustration::Remote(response.image_url)
            }
            Ok(_) => {
                log::warn!("No image URL in response");
                HeroIllustration::Fallback
            }
            Err(e) => {
                log::warn!("Error loading illustration: {}", e);
                HeroIllustration::Fallback
            }
        }
    }
}
