//! Configuration management for the Algolia MCP adapter.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! Credentials are read once here and never again per request.

use crate::core::error::{AlgoliaError, Result};
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Every toolset name the server knows how to register
pub const KNOWN_TOOLSETS: &[&str] = &[
    "search",
    "abtesting",
    "analytics",
    "collections",
    "monitoring",
    "query_suggestions",
    "recommend",
    "usage",
    "server",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub algolia: AlgoliaConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub hosts: HostsConfig,
}

/// Algolia credentials and default index
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AlgoliaConfig {
    #[serde(default)]
    pub app_id: String,

    /// Search-only (read) API key
    #[serde(default)]
    pub api_key: String,

    /// Admin key; write tools fail without it
    #[serde(default)]
    pub write_api_key: Option<String>,

    /// Index used when a tool call omits `indexName`
    #[serde(default)]
    pub index_name: Option<String>,
}

/// Transport the MCP server speaks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Stdio,
    Sse,
}

impl FromStr for Transport {
    type Err = AlgoliaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "sse" => Ok(Transport::Sse),
            other => Err(AlgoliaError::ConfigError(format!(
                "Unknown transport '{other}' (expected 'stdio' or 'sse')"
            ))),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Stdio => write!(f, "stdio"),
            Transport::Sse => write!(f, "sse"),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub transport: Transport,

    /// Bind address for the SSE transport
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Tool selection
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Skip every tool that mutates Algolia state
    #[serde(default)]
    pub read_only: bool,

    /// Enabled toolsets; empty means all
    #[serde(default)]
    pub toolsets: Vec<String>,
}

/// Outbound HTTP configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_sec: u64,
}

/// Base URLs of the Algolia APIs.
///
/// `{app_id}` and `{region}` placeholders are substituted per request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostsConfig {
    #[serde(default = "default_search_host")]
    pub search: String,
    #[serde(default = "default_analytics_host")]
    pub analytics: String,
    #[serde(default = "default_status_host")]
    pub status: String,
    #[serde(default = "default_usage_host")]
    pub usage: String,
    #[serde(default = "default_experiences_host")]
    pub experiences: String,
    #[serde(default = "default_query_suggestions_host")]
    pub query_suggestions: String,
}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout() -> u64 {
    30
}

fn default_search_host() -> String {
    "https://{app_id}.algolia.net".to_string()
}

fn default_analytics_host() -> String {
    "https://analytics.algolia.com".to_string()
}

fn default_status_host() -> String {
    "https://status.algolia.com".to_string()
}

fn default_usage_host() -> String {
    "https://usage.algolia.com".to_string()
}

fn default_experiences_host() -> String {
    "https://experiences.algolia.com".to_string()
}

fn default_query_suggestions_host() -> String {
    "https://query-suggestions.{region}.algolia.com".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_sec: default_timeout(),
        }
    }
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            search: default_search_host(),
            analytics: default_analytics_host(),
            status: default_status_host(),
            usage: default_usage_host(),
            experiences: default_experiences_host(),
            query_suggestions: default_query_suggestions_host(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            AlgoliaError::ConfigError(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// This method uses XDG Base Directory specification for file locations.
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg, None)
    }

    /// Load config with explicit XDG directories and optional file path
    ///
    /// Priority order:
    /// 1. Explicit path (the `--config` flag)
    /// 2. ALGOLIA_MCP_CONFIG env var
    /// 3. XDG config file (~/.config/algolia-mcp/config.toml)
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs, path: Option<&Path>) -> Result<Self> {
        let config = Self::resolve(xdg, path)?;
        config.validate()?;
        Ok(config)
    }

    /// Read file and env without validating. Used by `--list-tools`,
    /// which must work before credentials are configured.
    pub fn resolve(xdg: &XdgDirs, path: Option<&Path>) -> Result<Self> {
        // A file named by the flag or ALGOLIA_MCP_CONFIG must exist
        let explicit = path.map(Path::to_path_buf).or_else(XdgDirs::config_override);
        let mut config = match explicit {
            Some(p) => Self::from_file(p)?,
            None => {
                let file = xdg.config_file();
                if file.exists() {
                    Self::from_file(file)?
                } else {
                    Self::default()
                }
            }
        };

        config.merge_env();
        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Credentials
        if let Ok(app_id) = env::var("ALGOLIA_APP_ID") {
            self.algolia.app_id = app_id;
        }
        if let Ok(api_key) = env::var("ALGOLIA_API_KEY") {
            self.algolia.api_key = api_key;
        }
        if let Ok(write_key) = env::var("ALGOLIA_WRITE_API_KEY") {
            if !write_key.is_empty() {
                self.algolia.write_api_key = Some(write_key);
            }
        }
        if let Ok(index) = env::var("ALGOLIA_INDEX_NAME") {
            if !index.is_empty() {
                self.algolia.index_name = Some(index);
            }
        }

        // Server configuration
        if let Ok(transport) = env::var("ALGOLIA_MCP_TRANSPORT") {
            if let Ok(t) = transport.parse() {
                self.server.transport = t;
            }
        }
        if let Ok(host) = env::var("ALGOLIA_MCP_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("ALGOLIA_MCP_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }

        // Tool selection
        if let Ok(read_only) = env::var("ALGOLIA_MCP_READ_ONLY") {
            if let Ok(r) = read_only.parse() {
                self.tools.read_only = r;
            }
        }
        if let Ok(toolsets) = env::var("ALGOLIA_MCP_TOOLSETS") {
            self.tools.toolsets = split_list(&toolsets);
        }

        // HTTP
        if let Ok(timeout) = env::var("ALGOLIA_MCP_TIMEOUT_SEC") {
            if let Ok(t) = timeout.parse() {
                self.http.timeout_sec = t;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.algolia.app_id.trim().is_empty() {
            return Err(AlgoliaError::ConfigError(
                "Algolia application ID is not set (ALGOLIA_APP_ID)".to_string(),
            ));
        }

        if self.algolia.api_key.trim().is_empty() {
            return Err(AlgoliaError::ConfigError(
                "Algolia API key is not set (ALGOLIA_API_KEY)".to_string(),
            ));
        }

        if self.http.timeout_sec == 0 {
            return Err(AlgoliaError::ConfigError(
                "Request timeout must be non-zero".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(AlgoliaError::ConfigError(
                "Server port must be non-zero".to_string(),
            ));
        }

        for name in &self.tools.toolsets {
            if !KNOWN_TOOLSETS.contains(&name.as_str()) {
                return Err(AlgoliaError::ConfigError(format!(
                    "Unknown toolset '{name}' (known: {})",
                    KNOWN_TOOLSETS.join(", ")
                )));
            }
        }

        Ok(())
    }

    /// Whether a toolset is enabled (an empty list enables all)
    pub fn toolset_enabled(&self, name: &str) -> bool {
        self.tools.toolsets.is_empty() || self.tools.toolsets.iter().any(|t| t == name)
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  App ID: {}", self.algolia.app_id);
        tracing::info!("  API key: {}", redact(&self.algolia.api_key));
        tracing::info!(
            "  Write API key: {}",
            self.algolia
                .write_api_key
                .as_deref()
                .map(redact)
                .unwrap_or_else(|| "(not set)".to_string())
        );
        tracing::info!(
            "  Default index: {}",
            self.algolia.index_name.as_deref().unwrap_or("(not set)")
        );
        tracing::info!("  Transport: {}", self.server.transport);
        if self.server.transport == Transport::Sse {
            tracing::info!("  Listen: {}:{}", self.server.host, self.server.port);
        }
        tracing::info!("  Read only: {}", self.tools.read_only);
        if self.tools.toolsets.is_empty() {
            tracing::info!("  Toolsets: all");
        } else {
            tracing::info!("  Toolsets: {}", self.tools.toolsets.join(", "));
        }
        tracing::info!("  Request timeout: {}s", self.http.timeout_sec);
    }
}

/// Split a comma separated list, trimming and dropping empty entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Show only the last 4 characters of a secret
pub fn redact(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
