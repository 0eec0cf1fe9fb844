//! MCP protocol method handlers
//!
//! `dispatch` is the single entry point shared by the stdio and SSE
//! transports: it takes one raw JSON-RPC message and returns the
//! response to send, if any.

use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::*;
use crate::mcp::resources::ResourceProvider;
use crate::mcp::tools::ToolRegistry;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct ProtocolHandlers {
    initialized: AtomicBool,
    tool_registry: ToolRegistry,
    resources: ResourceProvider,
}

impl ProtocolHandlers {
    pub fn new(services: Arc<Services>) -> Self {
        let tool_registry = ToolRegistry::register_all(&services);
        info!("Registered {} tools", tool_registry.len());

        Self {
            initialized: AtomicBool::new(false),
            tool_registry,
            resources: ResourceProvider::new(services),
        }
    }

    pub fn tool_registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// Whether the client has sent `notifications/initialized`
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Handle one raw JSON-RPC message
    ///
    /// Returns `None` for notifications. Malformed input yields an
    /// error response rather than an error.
    pub async fn dispatch(&self, message: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(message) {
            Ok(v) => v,
            Err(e) => {
                warn!("Could not parse message: {}", e);
                return Some(error_response(None, McpError::ParseError(e.to_string())));
            }
        };

        if !value.is_object() {
            return Some(error_response(
                None,
                McpError::InvalidRequest("expected a JSON object".to_string()),
            ));
        }

        // Keep the id (if any) so even a malformed request can be answered
        let id = value.get("id").filter(|id| !id.is_null()).cloned();

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                return Some(error_response(id, McpError::InvalidRequest(e.to_string())));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(error_response(
                id,
                McpError::InvalidRequest(format!(
                    "unsupported jsonrpc version: {}",
                    request.jsonrpc
                )),
            ));
        }

        self.handle_request(request).await
    }

    /// Route a parsed request to its method handler
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        let id = request.id.clone();
        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(request).await,
            "ping" => self.handle_ping(request).await,
            "tools/list" => self.handle_tools_list(request).await,
            "tools/call" => self.handle_tools_call(request).await,
            "resources/list" => self.handle_resources_list(request).await,
            "resources/templates/list" => self.handle_resources_templates_list(request).await,
            "resources/read" => self.handle_resources_read(request).await,
            other => Ok(JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                format!("Unknown method: {other}"),
            )),
        };

        Some(result.unwrap_or_else(|e| error_response(id, e)))
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" | "initialized" => {
                self.initialized.store(true, Ordering::SeqCst);
                info!("Server initialized");
            }
            other => debug!("Ignoring notification {}", other),
        }
    }

    /// Handle initialize request
    pub async fn handle_initialize(
        &self,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, McpError> {
        let params: InitializeParams = match request.params {
            Some(Value::Null) | None => InitializeParams::default(),
            Some(p) => serde_json::from_value(p)
                .map_err(|e| McpError::InvalidParams(format!("Invalid initialize params: {e}")))?,
        };

        match &params.client_info {
            Some(client) => info!(
                "Client initialized: {} {}",
                client.name,
                client.version.as_deref().unwrap_or("")
            ),
            None => info!("Client initialized"),
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
                resources: ResourcesCapability {
                    subscribe: false,
                    list_changed: false,
                },
                logging: LoggingCapability::default(),
            },
            server_info: ServerInfo {
                name: "algolia-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(
            request.id,
            serde_json::to_value(result)?,
        ))
    }

    /// Handle ping request
    pub async fn handle_ping(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse, McpError> {
        Ok(JsonRpcResponse::success(request.id, json!({})))
    }

    /// Handle tools/list request
    pub async fn handle_tools_list(
        &self,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, McpError> {
        let tools = self.tool_registry.list();
        Ok(JsonRpcResponse::success(
            request.id,
            json!({ "tools": tools }),
        ))
    }

    /// Handle tools/call request
    pub async fn handle_tools_call(
        &self,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, McpError> {
        let params_value = request
            .params
            .ok_or_else(|| McpError::InvalidParams("Missing params".to_string()))?;
        let params: ToolCallParams = serde_json::from_value(params_value)
            .map_err(|e| McpError::InvalidParams(format!("Invalid params: {e}")))?;

        let handler = self
            .tool_registry
            .get(&params.name)
            .ok_or_else(|| McpError::InvalidParams(format!("Unknown tool: {}", params.name)))?;

        let start = Instant::now();
        let outcome = handler.execute(params.arguments).await;
        let elapsed = start.elapsed().as_millis();

        match outcome {
            Ok(result) => {
                info!("Tool {} completed in {}ms", params.name, elapsed);
                Ok(JsonRpcResponse::success(
                    request.id,
                    serde_json::to_value(result)?,
                ))
            }
            Err(e) => {
                warn!("Tool {} failed after {}ms: {}", params.name, elapsed, e);
                Err(e)
            }
        }
    }

    /// Handle resources/list request
    pub async fn handle_resources_list(
        &self,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, McpError> {
        Ok(JsonRpcResponse::success(
            request.id,
            json!({ "resources": self.resources.list() }),
        ))
    }

    /// Handle resources/templates/list request
    pub async fn handle_resources_templates_list(
        &self,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, McpError> {
        Ok(JsonRpcResponse::success(
            request.id,
            json!({ "resourceTemplates": self.resources.templates() }),
        ))
    }

    /// Handle resources/read request
    pub async fn handle_resources_read(
        &self,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, McpError> {
        let params_value = request
            .params
            .ok_or_else(|| McpError::InvalidParams("Missing params".to_string()))?;
        let params: ResourceReadParams = serde_json::from_value(params_value)
            .map_err(|e| McpError::InvalidParams(format!("Invalid params: {e}")))?;

        let contents = self.resources.read(&params.uri).await?;
        Ok(JsonRpcResponse::success(
            request.id,
            json!({ "contents": contents }),
        ))
    }
}

fn error_response(id: Option<Value>, error: McpError) -> JsonRpcResponse {
    let error = error.to_json_rpc_error();
    JsonRpcResponse::error(id, error.code, error.message)
}
