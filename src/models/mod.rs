// src/models/mod.rs

//! Domain models for the journal service.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

pub mod catalog;
mod citation;
mod config;
mod filters;
mod journal;
mod recommendation;

// Re-export all public types
pub use citation::CitationFormat;
pub use config::{
    ClientConfig, Config, GatewayConfig, IllustrationConfig, LoggingConfig, Messages,
    RateLimitConfig, RecommendConfig, ServerConfig, StorageBackend, StorageConfig,
};
pub use filters::{FacetFilters, SearchFilterSet};
pub use journal::{
    FacetValue, JournalRecord, Language, ResearchType, SintaAccreditation, Source,
};
pub use recommendation::{ErrorBody, IllustrationResponse, RecommendRequest, RecommendResponse};
