//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Inference gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Per-client request quota for `recommend-journals`
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Recommendation request limits
    #[serde(default)]
    pub recommend: RecommendConfig,

    /// Hero illustration generation
    #[serde(default)]
    pub illustration: IllustrationConfig,

    /// Illustration object storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP server binding
    #[serde(default)]
    pub server: ServerConfig,

    /// Client-side settings (functions endpoint, local cache)
    #[serde(default)]
    pub client: ClientConfig,

    /// User-visible strings
    #[serde(default)]
    pub messages: Messages,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Override settings from environment variables.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Override settings from an arbitrary variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("GATEWAY_BASE_URL") {
            self.gateway.base_url = url;
        }
        if let Some(n) = lookup("RATE_LIMIT_REQUESTS").and_then(|v| v.parse().ok()) {
            self.rate_limit.max_requests = n;
        }
        if let Some(secs) = lookup("RATE_LIMIT_WINDOW_SECS").and_then(|v| v.parse().ok()) {
            self.rate_limit.window_secs = secs;
        }
        if let Some(backend) = lookup("STORAGE_BACKEND") {
            match backend.to_lowercase().as_str() {
                "s3" => self.storage.backend = StorageBackend::S3,
                "local" => self.storage.backend = StorageBackend::Local,
                other => log::warn!("Ignoring unknown STORAGE_BACKEND '{}'", other),
            }
        }
        if let Some(bucket) = lookup("S3_BUCKET") {
            self.storage.bucket = bucket;
        }
        if let Some(prefix) = lookup("S3_PREFIX") {
            self.storage.prefix = prefix;
        }
        if let Some(url) = lookup("PUBLIC_BASE_URL") {
            self.storage.public_base_url = url;
        }
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = lookup("FUNCTIONS_URL") {
            self.client.functions_url = url;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.gateway.base_url)
            .map_err(|e| AppError::validation(format!("gateway.base_url: {e}")))?;
        if self.gateway.text_model.trim().is_empty() {
            return Err(AppError::validation("gateway.text_model is empty"));
        }
        if self.gateway.image_model.trim().is_empty() {
            return Err(AppError::validation("gateway.image_model is empty"));
        }
        if self.gateway.timeout_secs == 0 {
            return Err(AppError::validation("gateway.timeout_secs must be > 0"));
        }
        if self.gateway.api_key_env.trim().is_empty() {
            return Err(AppError::validation("gateway.api_key_env is empty"));
        }
        if self.rate_limit.max_requests == 0 {
            return Err(AppError::validation("rate_limit.max_requests must be > 0"));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(AppError::validation("rate_limit.window_secs must be > 0"));
        }
        if self.recommend.max_title_length == 0 {
            return Err(AppError::validation(
                "recommend.max_title_length must be > 0",
            ));
        }
        if self.illustration.name_prefix.trim().is_empty() {
            return Err(AppError::validation("illustration.name_prefix is empty"));
        }
        Url::parse(&self.storage.public_base_url)
            .map_err(|e| AppError::validation(format!("storage.public_base_url: {e}")))?;
        Url::parse(&self.client.functions_url)
            .map_err(|e| AppError::validation(format!("client.functions_url: {e}")))?;
        if self.client.cache_key.trim().is_empty() {
            return Err(AppError::validation("client.cache_key is empty"));
        }
        Ok(())
    }
}

/// Inference gateway (OpenAI-compatible chat completions) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "defaults::gateway_base_url")]
    pub base_url: String,

    /// Model used for thesis analysis
    #[serde(default = "defaults::text_model")]
    pub text_model: String,

    /// Image-capable model used for the hero illustration
    #[serde(default = "defaults::image_model")]
    pub image_model: String,

    #[serde(default = "defaults::temperature")]
    pub temperature: f32,

    #[serde(default = "defaults::gateway_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Environment variable holding the gateway credential
    #[serde(default = "defaults::api_key_env")]
    pub api_key_env: String,
}

impl GatewayConfig {
    /// Read the credential from the configured environment variable.
    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::gateway_base_url(),
            text_model: defaults::text_model(),
            image_model: defaults::image_model(),
            temperature: defaults::temperature(),
            timeout_secs: defaults::gateway_timeout(),
            user_agent: defaults::user_agent(),
            api_key_env: defaults::api_key_env(),
        }
    }
}

/// Fixed-window quota per client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "defaults::max_requests")]
    pub max_requests: u32,

    #[serde(default = "defaults::window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: defaults::max_requests(),
            window_secs: defaults::window_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendConfig {
    /// Longest accepted thesis title, in UTF-16 code units
    #[serde(default = "defaults::max_title_length")]
    pub max_title_length: usize,

    #[serde(default = "defaults::max_recommendations")]
    pub max_recommendations: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            max_title_length: defaults::max_title_length(),
            max_recommendations: defaults::max_recommendations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IllustrationConfig {
    /// Shared name prefix of generated assets
    #[serde(default = "defaults::name_prefix")]
    pub name_prefix: String,

    #[serde(default = "defaults::illustration_prompt")]
    pub prompt: String,
}

impl Default for IllustrationConfig {
    fn default() -> Self {
        Self {
            name_prefix: defaults::name_prefix(),
            prompt: defaults::illustration_prompt(),
        }
    }
}

/// Where generated illustrations are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
    S3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory of the local backend
    #[serde(default = "defaults::storage_root")]
    pub root_dir: PathBuf,

    #[serde(default = "defaults::bucket")]
    pub bucket: String,

    /// Key prefix inside the bucket
    #[serde(default)]
    pub prefix: String,

    /// Base URL objects are publicly reachable under
    #[serde(default = "defaults::public_base_url")]
    pub public_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            root_dir: defaults::storage_root(),
            bucket: defaults::bucket(),
            prefix: String::new(),
            public_base_url: defaults::public_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL the remote functions are mounted under
    #[serde(default = "defaults::functions_url")]
    pub functions_url: String,

    /// File backing the client-side key/value cache
    #[serde(default = "defaults::cache_path")]
    pub cache_path: PathBuf,

    /// Cache key of the resolved hero illustration URL
    #[serde(default = "defaults::cache_key")]
    pub cache_key: String,

    #[serde(default = "defaults::client_timeout")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            functions_url: defaults::functions_url(),
            cache_path: defaults::cache_path(),
            cache_key: defaults::cache_key(),
            timeout_secs: defaults::client_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// User-visible strings. Defaults are Indonesian.
///
/// Templates use `{}` / `{format}` placeholders filled at the call site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Messages {
    #[serde(default = "defaults::msg_rate_limited")]
    pub rate_limited: String,
    #[serde(default = "defaults::msg_title_required")]
    pub title_required: String,
    #[serde(default = "defaults::msg_title_too_long")]
    pub title_too_long: String,
    #[serde(default = "defaults::msg_invalid_research_type")]
    pub invalid_research_type: String,
    #[serde(default = "defaults::msg_title_empty")]
    pub title_empty: String,
    #[serde(default = "defaults::msg_service_unavailable")]
    pub service_unavailable: String,
    #[serde(default = "defaults::msg_upstream_rate_limited")]
    pub upstream_rate_limited: String,
    #[serde(default = "defaults::msg_quota_exhausted")]
    pub quota_exhausted: String,
    #[serde(default = "defaults::msg_generic_failure")]
    pub generic_failure: String,
    #[serde(default = "defaults::msg_illustration_failed")]
    pub illustration_failed: String,

    // Client-side notifications
    #[serde(default = "defaults::msg_panel_title_required")]
    pub panel_title_required: String,
    #[serde(default = "defaults::msg_panel_title_required_hint")]
    pub panel_title_required_hint: String,
    #[serde(default = "defaults::msg_panel_ready")]
    pub panel_ready: String,
    #[serde(default = "defaults::msg_panel_found")]
    pub panel_found: String,
    #[serde(default = "defaults::msg_panel_failed")]
    pub panel_failed: String,
    #[serde(default = "defaults::msg_citation_copied")]
    pub citation_copied: String,
    #[serde(default = "defaults::msg_citation_copied_detail")]
    pub citation_copied_detail: String,
    #[serde(default = "defaults::msg_citation_copy_failed")]
    pub citation_copy_failed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            rate_limited: defaults::msg_rate_limited(),
            title_required: defaults::msg_title_required(),
            title_too_long: defaults::msg_title_too_long(),
            invalid_research_type: defaults::msg_invalid_research_type(),
            title_empty: defaults::msg_title_empty(),
            service_unavailable: defaults::msg_service_unavailable(),
            upstream_rate_limited: defaults::msg_upstream_rate_limited(),
            quota_exhausted: defaults::msg_quota_exhausted(),
            generic_failure: defaults::msg_generic_failure(),
            illustration_failed: defaults::msg_illustration_failed(),
            panel_title_required: defaults::msg_panel_title_required(),
            panel_title_required_hint: defaults::msg_panel_title_required_hint(),
            panel_ready: defaults::msg_panel_ready(),
            panel_found: defaults::msg_panel_found(),
            panel_failed: defaults::msg_panel_failed(),
            citation_copied: defaults::msg_citation_copied(),
            citation_copied_detail: defaults::msg_citation_copied_detail(),
            citation_copy_failed: defaults::msg_citation_copy_failed(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Gateway defaults
    pub fn gateway_base_url() -> String {
        "https://ai.gateway.lovable.dev/v1".into()
    }
    pub fn text_model() -> String {
        "google/gemini-2.5-flash".into()
    }
    pub fn image_model() -> String {
        "google/gemini-2.5-flash-image-preview".into()
    }
    pub fn temperature() -> f32 {
        0.7
    }
    pub fn gateway_timeout() -> u64 {
        120
    }
    pub fn user_agent() -> String {
        "owwjurnal/0.1".into()
    }
    pub fn api_key_env() -> String {
        "LOVABLE_API_KEY".into()
    }

    // Rate limit defaults
    pub fn max_requests() -> u32 {
        10
    }
    pub fn window_secs() -> u64 {
        60
    }

    // Recommendation defaults
    pub fn max_title_length() -> usize {
        500
    }
    pub fn max_recommendations() -> usize {
        5
    }

    // Illustration defaults
    pub fn name_prefix() -> String {
        "hero-illustration".into()
    }
    pub fn illustration_prompt() -> String {
        "Create an isometric 3D illustration of a young college student (wearing casual clothes like hoodie)
searching for academic journals on a laptop. The scene should include:
- A modern desk with an open laptop showing a search interface with journal results
- Stacks of colorful academic books and journal papers scattered around
- A warm coffee cup with steam and some stationery items
- Floating icons representing research: lightbulb, magnifying glass, graduation cap, stars
- Color palette: warm pink (#F97316), coral orange (#FB923C), soft yellow (#FBBF24), cream white background
- Style: Clean isometric 3D vector illustration, modern, friendly and welcoming
- The student should look happy and engaged
- Add subtle shadows for depth
- No text, pure illustration
- High quality, clean vector-style rendering with smooth gradients
- Aspect ratio 1:1 square format"
            .into()
    }

    // Storage defaults
    pub fn storage_root() -> PathBuf {
        PathBuf::from("storage/illustrations")
    }
    pub fn bucket() -> String {
        "illustrations".into()
    }
    pub fn public_base_url() -> String {
        "http://localhost:8080/illustrations".into()
    }

    // Server defaults
    pub fn host() -> String {
        "127.0.0.1".into()
    }
    pub fn port() -> u16 {
        8080
    }

    // Client defaults
    pub fn functions_url() -> String {
        "http://localhost:8080/functions".into()
    }
    pub fn cache_path() -> PathBuf {
        PathBuf::from("storage/client-cache.json")
    }
    pub fn cache_key() -> String {
        "hero-illustration-url".into()
    }
    pub fn client_timeout() -> u64 {
        120
    }

    pub fn log_level() -> String {
        "info".into()
    }

    // Message defaults
    pub fn msg_rate_limited() -> String {
        "Terlalu banyak permintaan. Coba lagi dalam 1 menit.".into()
    }
    pub fn msg_title_required() -> String {
        "Judul skripsi diperlukan".into()
    }
    pub fn msg_title_too_long() -> String {
        "Judul skripsi maksimal {} karakter".into()
    }
    pub fn msg_invalid_research_type() -> String {
        "Jenis penelitian tidak valid".into()
    }
    pub fn msg_title_empty() -> String {
        "Judul skripsi tidak boleh kosong".into()
    }
    pub fn msg_service_unavailable() -> String {
        "Layanan tidak tersedia".into()
    }
    pub fn msg_upstream_rate_limited() -> String {
        "Terlalu banyak permintaan, coba lagi nanti".into()
    }
    pub fn msg_quota_exhausted() -> String {
        "Kuota AI habis, silakan coba lagi nanti".into()
    }
    pub fn msg_generic_failure() -> String {
        "Terjadi kesalahan, silakan coba lagi".into()
    }
    pub fn msg_illustration_failed() -> String {
        "Gagal membuat ilustrasi, silakan coba lagi".into()
    }
    pub fn msg_panel_title_required() -> String {
        "Judul diperlukan".into()
    }
    pub fn msg_panel_title_required_hint() -> String {
        "Masukkan judul skripsi kamu terlebih dahulu".into()
    }
    pub fn msg_panel_ready() -> String {
        "Rekomendasi siap!".into()
    }
    pub fn msg_panel_found() -> String {
        "Ditemukan {} jurnal yang relevan".into()
    }
    pub fn msg_panel_failed() -> String {
        "Gagal mendapatkan rekomendasi".into()
    }
    pub fn msg_citation_copied() -> String {
        "Sitasi disalin!".into()
    }
    pub fn msg_citation_copied_detail() -> String {
        "Format {} berhasil disalin ke clipboard".into()
    }
    pub fn msg_citation_copy_failed() -> String {
        "Gagal menyalin sitasi".into()
    }
}
