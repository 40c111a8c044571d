// src/error.rs

//! Unified error handling for the journal service.

use std::fmt;

use thiserror::Error;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Embedded image payload could not be decoded
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Inference gateway replied with a non-success status
    #[error("AI Gateway error: {status}")]
    Upstream { status: u16, message: String },

    /// Inference gateway replied successfully but without usable content
    #[error("{0}")]
    EmptyCompletion(String),

    /// Object storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// A generated asset could not be stored; the message is client-safe
    #[error("{0}")]
    Upload(String),

    /// A remote function answered with an `{error}` body
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// Clipboard access failed
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a storage error.
    pub fn storage(message: impl fmt::Display) -> Self {
        Self::Storage(message.to_string())
    }

    /// Create an upstream error from a gateway status and reply body.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Create a clipboard error.
    pub fn clipboard(message: impl fmt::Display) -> Self {
        Self::Clipboard(message.to_string())
    }

    /// HTTP status of an upstream gateway failure, if this is one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
