//! algolia-mcp - Algolia APIs as Model Context Protocol tools
//!
//! A protocol adapter that exposes Algolia search, analytics,
//! monitoring and related REST APIs as MCP tools and resources.
//! Every tool call becomes one HTTP request; the JSON response is
//! returned to the caller as an embedded resource.
//!
//! # Architecture
//!
//! - **core**: Protocol-agnostic pieces
//!   - config, error, xdg
//!   - client (Algolia REST over reqwest)
//!   - services (unified service container)
//!
//! - **mcp**: MCP adapter (depends on core)
//!   - protocol, handlers, tools, resources
//!   - stdio server and HTTP+SSE transport
//!
//! - **cli**: clap front end used by the `algolia-mcp` binary

// Core logic (protocol-agnostic)
pub mod core;

// MCP (Model Context Protocol) adapter
pub mod mcp;

// Command-line front end
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{AlgoliaError, Result};
pub use core::services::Services;
