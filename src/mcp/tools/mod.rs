//! MCP tool implementations
//!
//! Tools are grouped into toolsets, one module per Algolia API. Each
//! toolset module exposes `handlers()`, which the registry uses to
//! enable or skip the whole group.

pub mod abtesting;
pub mod analytics;
pub mod collections;
pub mod get_server_info;
pub mod handler;
pub mod helpers;
pub mod monitoring;
pub mod query_suggestions;
pub mod recommend;
pub mod registry;
pub mod search;
pub mod usage;

pub use get_server_info::GetServerInfoHandler;
pub use handler::{json_result, text_content, McpToolHandler};
pub use registry::ToolRegistry;
