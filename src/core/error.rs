//! Error types and error handling for the Algolia MCP adapter.
//!
//! This module defines the error types used throughout the
//! application. Protocol-specific error handling (MCP error codes)
//! is handled in the `mcp` adapter module.

use thiserror::Error;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, AlgoliaError>;

/// Main error type for the adapter
#[derive(Error, Debug)]
pub enum AlgoliaError {
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Algolia API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl AlgoliaError {
    /// Check if the failure came from the remote API or the network
    pub fn is_upstream(&self) -> bool {
        matches!(self, AlgoliaError::Api { .. } | AlgoliaError::Http(_))
    }
}
