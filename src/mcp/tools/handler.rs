//! Tool handler trait and common result builders

use crate::mcp::error::McpError;
use crate::mcp::protocol::{ContentBlock, ResourceContents, ToolResult, ToolSchema, JSON_MIME_TYPE};
use async_trait::async_trait;
use serde_json::Value;

/// Trait for MCP tool implementations
///
/// Each tool (run_query, list_indices, etc.) implements this trait
/// to provide schema and execution logic.
#[async_trait]
pub trait McpToolHandler: Send + Sync {
    /// Tool name (e.g., "run_query")
    fn name(&self) -> &str;

    /// Tool schema for tools/list
    fn schema(&self) -> ToolSchema;

    /// Whether the tool mutates Algolia state. Write tools are
    /// skipped in read-only mode.
    fn is_write(&self) -> bool {
        false
    }

    /// Execute tool with arguments
    async fn execute(&self, args: Value) -> Result<ToolResult, McpError>;
}

/// Helper function to create a text content block
pub fn text_content(text: String) -> ToolResult {
    ToolResult {
        content: vec![ContentBlock::Text { text }],
        is_error: None,
    }
}

/// Wrap an API response as a titled, embedded JSON resource
pub fn json_result(title: &str, value: &Value) -> Result<ToolResult, McpError> {
    let text = serde_json::to_string(value)?;

    Ok(ToolResult {
        content: vec![
            ContentBlock::Text {
                text: title.to_string(),
            },
            ContentBlock::Resource {
                resource: ResourceContents {
                    uri: format!("algolia://results/{}", slug(title)),
                    mime_type: JSON_MIME_TYPE.to_string(),
                    text,
                },
            },
        ],
        is_error: None,
    })
}

fn slug(title: &str) -> String {
    title
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
