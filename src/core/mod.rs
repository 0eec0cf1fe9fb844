//! Core logic (protocol-agnostic)
//!
//! This module contains everything that is independent of the MCP
//! transport: configuration, errors and the Algolia HTTP client.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **xdg**: XDG directory handling
//! - **client**: Algolia REST client (reqwest)
//! - **services**: Unified service container

pub mod client;
pub mod config;
pub mod error;
pub mod services;
pub mod xdg;

// Re-export key types for convenience
pub use client::{AlgoliaClient, Api, ApiRequest, KeyKind, Region};
pub use config::Config;
pub use error::{AlgoliaError, Result};
pub use services::Services;
