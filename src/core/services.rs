//! Unified service container for the Algolia MCP adapter
//!
//! Provides shared access to configuration and the Algolia client.

use crate::core::client::AlgoliaClient;
use crate::core::config::Config;
use crate::core::error::Result;
use std::sync::Arc;

/// Unified services container
///
/// Both transports and every tool share the same instance.
#[derive(Clone)]
pub struct Services {
    /// Application configuration (credentials loaded once at startup)
    pub config: Arc<Config>,

    /// HTTP client for the Algolia APIs
    pub client: Arc<AlgoliaClient>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Result<Self> {
        let client = Arc::new(AlgoliaClient::new(&config)?);

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Index used when a tool call does not name one
    pub fn default_index(&self) -> Option<&str> {
        self.config.algolia.index_name.as_deref()
    }
}
