//! MCP (Model Context Protocol) server module
//!
//! This module implements a JSON-RPC 2.0 compliant MCP server that
//! exposes the Algolia APIs as MCP tools and resources, over stdio or
//! HTTP+SSE.

pub mod error;
pub mod handlers;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod sse;
pub mod tools;
pub mod transport;

// Re-export main types
pub use error::McpError;
pub use handlers::ProtocolHandlers;
pub use server::McpServer;
pub use tools::{McpToolHandler, ToolRegistry};
