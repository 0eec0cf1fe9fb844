//! Get server info tool handler
//!
//! Returns version, transport and the tool catalog of the running
//! algolia-mcp server.

use super::handler::{text_content, McpToolHandler};
use crate::core::config::Config;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema, PROTOCOL_VERSION};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct GetServerInfoHandler {
    config: Arc<Config>,
    toolsets: Vec<String>,
    tools: Vec<String>,
}

impl GetServerInfoHandler {
    /// `toolsets` and `tools` are what the registry ended up enabling
    pub fn new(config: Arc<Config>, toolsets: Vec<String>, tools: Vec<String>) -> Self {
        Self {
            config,
            toolsets,
            tools,
        }
    }

    fn format_info(&self) -> String {
        let version = env!("CARGO_PKG_VERSION");

        let mut output = String::from("# Algolia MCP Server Information\n\n");

        output.push_str("## Version\n");
        output.push_str(&format!("- **Version:** {version}\n"));
        output.push_str(&format!("- **Protocol:** MCP {PROTOCOL_VERSION}\n\n"));

        output.push_str("## Server Details\n");
        output.push_str("- **Name:** algolia-mcp\n");
        output.push_str(&format!(
            "- **Transport:** {}\n",
            self.config.server.transport
        ));
        output.push_str(&format!(
            "- **Application:** {}\n",
            display_or_unset(&self.config.algolia.app_id)
        ));
        output.push_str(&format!(
            "- **Default index:** {}\n",
            self.config.algolia.index_name.as_deref().unwrap_or("(unset)")
        ));
        output.push_str(&format!(
            "- **Read-only:** {}\n\n",
            self.config.tools.read_only
        ));

        output.push_str("## Enabled Toolsets\n");
        for toolset in &self.toolsets {
            output.push_str(&format!("- {toolset}\n"));
        }

        output.push_str(&format!("\n## Available Tools ({})\n", self.tools.len()));
        for tool in &self.tools {
            output.push_str(&format!("- {tool}\n"));
        }

        output
    }
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

#[async_trait]
impl McpToolHandler for GetServerInfoHandler {
    fn name(&self) -> &str {
        "get_server_info"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_server_info".to_string(),
            description: "Get version and configuration information about the running algolia-mcp server. \
                         Returns server version, protocol version, transport, enabled toolsets and \
                         available tools. Does not call Algolia."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    async fn execute(&self, _args: Value) -> Result<ToolResult, McpError> {
        let text = self.format_info();
        Ok(text_content(text))
    }
}
