//! Tool registry for managing MCP tools

use super::handler::McpToolHandler;
use super::{
    abtesting, analytics, collections, get_server_info::GetServerInfoHandler, monitoring,
    query_suggestions, recommend, search, usage,
};
use crate::core::services::Services;
use crate::mcp::protocol::ToolSchema;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

type ToolsetBuilder = fn(&Arc<Services>) -> Vec<Arc<dyn McpToolHandler>>;

/// Toolsets in the order their tools appear in tools/list.
/// `server` is handled separately since it reports on the others.
const TOOLSETS: &[(&str, ToolsetBuilder)] = &[
    ("search", search::handlers),
    ("abtesting", abtesting::handlers),
    ("analytics", analytics::handlers),
    ("collections", collections::handlers),
    ("monitoring", monitoring::handlers),
    ("query_suggestions", query_suggestions::handlers),
    ("recommend", recommend::handlers),
    ("usage", usage::handlers),
];

/// Registry for all available MCP tools
///
/// Maintains tool handlers in registration order so tools/list is
/// stable across calls.
pub struct ToolRegistry {
    handlers: Vec<Arc<dyn McpToolHandler>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build the registry from configuration: disabled toolsets are
    /// skipped, and so are write tools in read-only mode.
    pub fn register_all(services: &Arc<Services>) -> Self {
        let config = &services.config;
        let mut registry = Self::new();
        let mut enabled = Vec::new();

        for (name, build) in TOOLSETS {
            if !config.toolset_enabled(name) {
                debug!("Toolset {} disabled", name);
                continue;
            }
            enabled.push(name.to_string());

            for handler in build(services) {
                if config.tools.read_only && handler.is_write() {
                    debug!("Skipping write tool {} (read-only)", handler.name());
                    continue;
                }
                registry.register(handler);
            }
        }

        if config.toolset_enabled("server") {
            enabled.push("server".to_string());
            let mut tools = registry.names();
            tools.push("get_server_info".to_string());
            registry.register(Arc::new(GetServerInfoHandler::new(
                Arc::clone(config),
                enabled,
                tools,
            )));
        }

        registry
    }

    /// Register a tool handler, replacing any handler with the same name
    pub fn register(&mut self, handler: Arc<dyn McpToolHandler>) {
        let name = handler.name().to_string();
        match self.index.get(&name) {
            Some(&pos) => self.handlers[pos] = handler,
            None => {
                self.index.insert(name, self.handlers.len());
                self.handlers.push(handler);
            }
        }
    }

    /// Get a tool handler by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn McpToolHandler>> {
        self.index.get(name).map(|&pos| &self.handlers[pos])
    }

    /// List all available tool schemas
    pub fn list(&self) -> Vec<ToolSchema> {
        self.handlers
            .iter()
            .map(|handler| handler.schema())
            .collect()
    }

    /// Registered handlers, in order
    pub fn handlers(&self) -> impl Iterator<Item = &Arc<dyn McpToolHandler>> {
        self.handlers.iter()
    }

    /// Registered tool names, in order
    pub fn names(&self) -> Vec<String> {
        self.handlers.iter().map(|h| h.name().to_string()).collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get number of registered tools
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
