//! XDG Base Directory Support
//!
//! Resolves where algolia-mcp looks for its configuration file on
//! Linux/Unix systems.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "algolia-mcp";

/// XDG directory structure for algolia-mcp
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
}

impl XdgDirs {
    /// Create new XDG directory structure with proper resolution order
    ///
    /// Priority order (highest to lowest):
    /// 1. ALGOLIA_MCP_CONFIG_DIR
    /// 2. XDG_CONFIG_HOME
    /// 3. XDG default (~/.config)
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(dir) = env::var("ALGOLIA_MCP_CONFIG_DIR") {
            return PathBuf::from(dir);
        }

        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join(APP_DIR);
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR)
    }

    /// Config file named by ALGOLIA_MCP_CONFIG, if set
    pub fn config_override() -> Option<PathBuf> {
        env::var("ALGOLIA_MCP_CONFIG")
            .ok()
            .filter(|file| !file.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Get config file path
    pub fn config_file(&self) -> PathBuf {
        Self::config_override().unwrap_or_else(|| self.config_dir.join("config.toml"))
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}
