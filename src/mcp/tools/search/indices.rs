//! Index-level tools: listing, settings, clear, delete, copy and move

use super::{index_name_property, index_only_schema};
use crate::core::client::{Api, ApiRequest};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use crate::mcp::tools::handler::{json_result, McpToolHandler};
use crate::mcp::tools::helpers::{parse_args, parse_json_arg, require_non_empty, resolve_index};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexArgs {
    #[serde(default)]
    index_name: Option<String>,
}

pub struct ListIndicesHandler {
    services: Arc<Services>,
}

impl ListIndicesHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for ListIndicesHandler {
    fn name(&self) -> &str {
        "list_indices"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "list_indices".to_string(),
            description: "List the indices in the application".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    async fn execute(&self, _args: Value) -> Result<ToolResult, McpError> {
        let res = self
            .services
            .client
            .send(ApiRequest::get(Api::Search, &["1", "indexes"]))
            .await?;
        json_result("indices", &res)
    }
}

pub struct GetSettingsHandler {
    services: Arc<Services>,
}

impl GetSettingsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetSettingsHandler {
    fn name(&self) -> &str {
        "get_settings"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_settings".to_string(),
            description: "Get the settings for the Algolia index".to_string(),
            input_schema: index_only_schema(),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: IndexArgs = parse_args(args)?;
        let index = resolve_index(&self.services, args.index_name)?;

        let res = self
            .services
            .client
            .send(ApiRequest::get(
                Api::Search,
                &["1", "indexes", &index, "settings"],
            ))
            .await?;
        json_result("settings", &res)
    }
}

pub struct SetSettingsHandler {
    services: Arc<Services>,
}

impl SetSettingsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for SetSettingsHandler {
    fn name(&self) -> &str {
        "set_settings"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "set_settings".to_string(),
            description: "Change the settings for the Algolia index".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "object": {
                        "type": "string",
                        "description": "The settings to apply as a JSON object string"
                    },
                    "indexName": index_name_property()
                },
                "required": ["object"]
            }),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct SetSettingsArgs {
            object: Value,
            #[serde(default)]
            index_name: Option<String>,
        }

        let args: SetSettingsArgs = parse_args(args)?;
        let settings: Map<String, Value> = parse_json_arg("object", args.object)?;
        let index = resolve_index(&self.services, args.index_name)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::put(Api::Search, &["1", "indexes", &index, "settings"])
                    .json(Value::Object(settings))
                    .write("change settings"),
            )
            .await?;
        json_result("task", &res)
    }
}

pub struct ClearIndexHandler {
    services: Arc<Services>,
}

impl ClearIndexHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for ClearIndexHandler {
    fn name(&self) -> &str {
        "clear_index"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "clear_index".to_string(),
            description: "Clear an index by removing all records. Settings, rules and synonyms are kept."
                .to_string(),
            input_schema: index_only_schema(),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: IndexArgs = parse_args(args)?;
        let index = resolve_index(&self.services, args.index_name)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::post(Api::Search, &["1", "indexes", &index, "clear"])
                    .write("clear index"),
            )
            .await?;
        json_result("task", &res)
    }
}

pub struct DeleteIndexHandler {
    services: Arc<Services>,
}

impl DeleteIndexHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for DeleteIndexHandler {
    fn name(&self) -> &str {
        "delete_index"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_index".to_string(),
            description: "Delete an index by removing all assets and configurations".to_string(),
            input_schema: index_only_schema(),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: IndexArgs = parse_args(args)?;
        let index = resolve_index(&self.services, args.index_name)?;

        let res = self
            .services
            .client
            .send(ApiRequest::delete(Api::Search, &["1", "indexes", &index]).write("delete index"))
            .await?;
        json_result("task", &res)
    }
}

/// `copy` or `move` through the index operation endpoint
async fn index_operation(
    services: &Services,
    operation: &'static str,
    args: Value,
) -> Result<ToolResult, McpError> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct OperationArgs {
        destination: String,
        #[serde(default)]
        index_name: Option<String>,
    }

    let args: OperationArgs = parse_args(args)?;
    require_non_empty("destination", &args.destination)?;
    let source = resolve_index(services, args.index_name)?;

    if source == args.destination {
        return Err(McpError::InvalidParams(
            "destination must differ from the source index".to_string(),
        ));
    }

    let action = if operation == "move" {
        "move index"
    } else {
        "copy index"
    };

    let res = services
        .client
        .send(
            ApiRequest::post(Api::Search, &["1", "indexes", &source, "operation"])
                .json(json!({
                    "operation": operation,
                    "destination": args.destination,
                }))
                .write(action),
        )
        .await?;
    json_result("task", &res)
}

fn operation_schema(name: &str, description: &str) -> ToolSchema {
    ToolSchema {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "destination": {
                    "type": "string",
                    "description": "The name of the destination index"
                },
                "indexName": index_name_property()
            },
            "required": ["destination"]
        }),
    }
}

pub struct CopyIndexHandler {
    services: Arc<Services>,
}

impl CopyIndexHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for CopyIndexHandler {
    fn name(&self) -> &str {
        "copy_index"
    }

    fn schema(&self) -> ToolSchema {
        operation_schema(
            "copy_index",
            "Copy an index (records, settings, synonyms and rules) to another index",
        )
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        index_operation(&self.services, "copy", args).await
    }
}

pub struct MoveIndexHandler {
    services: Arc<Services>,
}

impl MoveIndexHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for MoveIndexHandler {
    fn name(&self) -> &str {
        "move_index"
    }

    fn schema(&self) -> ToolSchema {
        operation_schema(
            "move_index",
            "Move (rename) an index. The source index is removed once the move completes.",
        )
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        index_operation(&self.services, "move", args).await
    }
}
