//! MCP-specific error types

use crate::core::error::AlgoliaError;
use crate::mcp::protocol::{
    JsonRpcError, ALGOLIA_API_ERROR, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    MISSING_CREDENTIALS, PARSE_ERROR, RESOURCE_NOT_FOUND,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Tool error (code {0}): {1}")]
    ToolError(i32, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    /// JSON-RPC error code and message for this error
    pub fn code_and_message(&self) -> (i32, String) {
        match self {
            McpError::ParseError(_) => (PARSE_ERROR, self.to_string()),
            McpError::InvalidRequest(_) => (INVALID_REQUEST, self.to_string()),
            McpError::InvalidParams(msg) => (INVALID_PARAMS, msg.clone()),
            McpError::InternalError(msg) => (INTERNAL_ERROR, msg.clone()),
            McpError::ResourceNotFound(uri) => {
                (RESOURCE_NOT_FOUND, format!("Resource not found: {uri}"))
            }
            McpError::ToolError(code, msg) => (*code, msg.clone()),
            McpError::Io(e) => (INTERNAL_ERROR, format!("I/O error: {e}")),
            McpError::Json(e) => (INTERNAL_ERROR, format!("JSON error: {e}")),
        }
    }

    pub fn to_json_rpc_error(&self) -> JsonRpcError {
        let (code, message) = self.code_and_message();
        JsonRpcError {
            code,
            message,
            data: None,
        }
    }
}

impl From<AlgoliaError> for McpError {
    fn from(err: AlgoliaError) -> Self {
        match err {
            AlgoliaError::MissingCredentials(s) => McpError::ToolError(MISSING_CREDENTIALS, s),
            AlgoliaError::InvalidArgument(s) => McpError::InvalidParams(s),
            e @ AlgoliaError::Api { .. } => McpError::ToolError(ALGOLIA_API_ERROR, e.to_string()),
            e @ AlgoliaError::Http(_) => McpError::ToolError(ALGOLIA_API_ERROR, e.to_string()),
            AlgoliaError::Url(e) => McpError::InternalError(format!("Invalid URL: {e}")),
            AlgoliaError::ConfigError(s) => {
                McpError::InternalError(format!("Configuration error: {s}"))
            }
            AlgoliaError::IoError(e) => McpError::InternalError(format!("I/O error: {e}")),
            AlgoliaError::SerdeError(e) => {
                McpError::InternalError(format!("Could not decode response: {e}"))
            }
            AlgoliaError::TomlError(e) => {
                McpError::InternalError(format!("Configuration parse error: {e}"))
            }
        }
    }
}
