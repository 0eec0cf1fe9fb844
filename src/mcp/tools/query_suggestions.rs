//! Query Suggestions toolset
//!
//! Every tool takes a `region` (`us` or `eu`) selecting the regional
//! Query Suggestions host.

use super::handler::{json_result, McpToolHandler};
use super::helpers::{parse_args, parse_json_arg, require_non_empty};
use crate::core::client::{Api, ApiRequest, Region};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::str::FromStr;
use std::sync::Arc;

/// All query suggestions tools
pub fn handlers(services: &Arc<Services>) -> Vec<Arc<dyn McpToolHandler>> {
    let s = || Arc::clone(services);
    vec![
        Arc::new(ListConfigsHandler::new(s())),
        Arc::new(GetConfigHandler::new(s())),
        Arc::new(GetConfigStatusHandler::new(s())),
        Arc::new(GetLogFileHandler::new(s())),
        Arc::new(CreateConfigHandler::new(s())),
        Arc::new(UpdateConfigHandler::new(s())),
        Arc::new(DeleteConfigHandler::new(s())),
    ]
}

fn region_property() -> Value {
    json!({
        "type": "string",
        "enum": ["us", "eu"],
        "description": "Analytics region (us or eu)"
    })
}

fn region_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "region": region_property()
        },
        "required": ["region"]
    })
}

fn config_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "region": region_property(),
            "indexName": {
                "type": "string",
                "description": "Query Suggestions index name"
            }
        },
        "required": ["region", "indexName"]
    })
}

fn config_body_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "region": region_property(),
            "indexName": {
                "type": "string",
                "description": "Query Suggestions index name"
            },
            "sourceIndices": {
                "type": "string",
                "description": "JSON array of source indices configurations"
            },
            "languages": {
                "type": "string",
                "description": "JSON array of languages or boolean for deduplicating singular and plural suggestions"
            },
            "exclude": {
                "type": "string",
                "description": "JSON array of words or regular expressions to exclude from the suggestions"
            },
            "enablePersonalization": {
                "type": "boolean",
                "description": "Whether to turn on personalized query suggestions"
            },
            "allowSpecialCharacters": {
                "type": "boolean",
                "description": "Whether to include suggestions with special characters"
            }
        },
        "required": ["region", "indexName", "sourceIndices"]
    })
}

fn parse_region(region: &str) -> Result<Region, McpError> {
    Ok(Region::from_str(region)?)
}

#[derive(Deserialize)]
struct RegionArgs {
    region: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigArgs {
    region: String,
    index_name: String,
}

impl ConfigArgs {
    fn parse(args: Value) -> Result<(Region, String), McpError> {
        let args: ConfigArgs = parse_args(args)?;
        let region = parse_region(&args.region)?;
        require_non_empty("indexName", &args.index_name)?;
        Ok((region, args.index_name))
    }
}

/// Arguments shared by create and update
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigBodyArgs {
    region: String,
    index_name: String,
    source_indices: Value,
    #[serde(default)]
    languages: Value,
    #[serde(default)]
    exclude: Value,
    #[serde(default)]
    enable_personalization: Option<bool>,
    #[serde(default)]
    allow_special_characters: Option<bool>,
}

fn present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

impl ConfigBodyArgs {
    /// Validated region, index name, and request body
    fn into_parts(self) -> Result<(Region, String, Value), McpError> {
        let region = parse_region(&self.region)?;
        require_non_empty("indexName", &self.index_name)?;
        if !present(&self.source_indices) {
            return Err(McpError::InvalidParams(
                "sourceIndices cannot be empty".to_string(),
            ));
        }

        let mut body = Map::new();
        body.insert("indexName".to_string(), json!(self.index_name));
        let source_indices: Vec<Value> = parse_json_arg("sourceIndices", self.source_indices)?;
        body.insert("sourceIndices".to_string(), json!(source_indices));

        if present(&self.languages) {
            let languages: Value = parse_json_arg("languages", self.languages)?;
            body.insert("languages".to_string(), languages);
        }
        if present(&self.exclude) {
            let exclude: Vec<String> = parse_json_arg("exclude", self.exclude)?;
            body.insert("exclude".to_string(), json!(exclude));
        }
        if let Some(enabled) = self.enable_personalization {
            body.insert("enablePersonalization".to_string(), json!(enabled));
        }
        if let Some(allowed) = self.allow_special_characters {
            body.insert("allowSpecialCharacters".to_string(), json!(allowed));
        }

        Ok((region, self.index_name, Value::Object(body)))
    }
}

pub struct ListConfigsHandler {
    services: Arc<Services>,
}

impl ListConfigsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for ListConfigsHandler {
    fn name(&self) -> &str {
        "query_suggestions_list_configs"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "query_suggestions_list_configs".to_string(),
            description: "Retrieves all Query Suggestions configurations of your Algolia application"
                .to_string(),
            input_schema: region_schema(),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: RegionArgs = parse_args(args)?;
        let region = parse_region(&args.region)?;

        let res = self
            .services
            .client
            .send(ApiRequest::get(Api::QuerySuggestions(region), &["1", "configs"]))
            .await?;
        json_result("Query Suggestions Configurations", &res)
    }
}

pub struct GetConfigHandler {
    services: Arc<Services>,
}

impl GetConfigHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetConfigHandler {
    fn name(&self) -> &str {
        "query_suggestions_get_config"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "query_suggestions_get_config".to_string(),
            description: "Retrieves a single Query Suggestions configuration by its index name"
                .to_string(),
            input_schema: config_schema(),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let (region, index) = ConfigArgs::parse(args)?;

        let res = self
            .services
            .client
            .send(ApiRequest::get(
                Api::QuerySuggestions(region),
                &["1", "configs", &index],
            ))
            .await?;
        json_result("Query Suggestions Configuration", &res)
    }
}

pub struct GetConfigStatusHandler {
    services: Arc<Services>,
}

impl GetConfigStatusHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetConfigStatusHandler {
    fn name(&self) -> &str {
        "query_suggestions_get_config_status"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "query_suggestions_get_config_status".to_string(),
            description: "Reports the status of a Query Suggestions index".to_string(),
            input_schema: config_schema(),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let (region, index) = ConfigArgs::parse(args)?;

        let res = self
            .services
            .client
            .send(ApiRequest::get(
                Api::QuerySuggestions(region),
                &["1", "configs", &index, "status"],
            ))
            .await?;
        json_result("Query Suggestions Configuration Status", &res)
    }
}

pub struct GetLogFileHandler {
    services: Arc<Services>,
}

impl GetLogFileHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetLogFileHandler {
    fn name(&self) -> &str {
        "query_suggestions_get_log_file"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "query_suggestions_get_log_file".to_string(),
            description: "Retrieves the logs for a single Query Suggestions index".to_string(),
            input_schema: config_schema(),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let (region, index) = ConfigArgs::parse(args)?;

        let res = self
            .services
            .client
            .send(ApiRequest::get(
                Api::QuerySuggestions(region),
                &["1", "logs", &index],
            ))
            .await?;
        json_result("Query Suggestions Log File", &res)
    }
}

pub struct CreateConfigHandler {
    services: Arc<Services>,
}

impl CreateConfigHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for CreateConfigHandler {
    fn name(&self) -> &str {
        "query_suggestions_create_config"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "query_suggestions_create_config".to_string(),
            description: "Creates a new Query Suggestions configuration".to_string(),
            input_schema: config_body_schema(),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: ConfigBodyArgs = parse_args(args)?;
        let (region, _, body) = args.into_parts()?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::post(Api::QuerySuggestions(region), &["1", "configs"])
                    .json(body)
                    .write("create query suggestions configurations"),
            )
            .await?;
        json_result("Query Suggestions Configuration Created", &res)
    }
}

pub struct UpdateConfigHandler {
    services: Arc<Services>,
}

impl UpdateConfigHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for UpdateConfigHandler {
    fn name(&self) -> &str {
        "query_suggestions_update_config"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "query_suggestions_update_config".to_string(),
            description: "Updates a Query Suggestions configuration".to_string(),
            input_schema: config_body_schema(),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: ConfigBodyArgs = parse_args(args)?;
        let (region, index, body) = args.into_parts()?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::put(Api::QuerySuggestions(region), &["1", "configs", &index])
                    .json(body)
                    .write("update query suggestions configurations"),
            )
            .await?;
        json_result("Query Suggestions Configuration Updated", &res)
    }
}

pub struct DeleteConfigHandler {
    services: Arc<Services>,
}

impl DeleteConfigHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for DeleteConfigHandler {
    fn name(&self) -> &str {
        "query_suggestions_delete_config"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "query_suggestions_delete_config".to_string(),
            description: "Deletes a Query Suggestions configuration".to_string(),
            input_schema: config_schema(),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let (region, index) = ConfigArgs::parse(args)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::delete(Api::QuerySuggestions(region), &["1", "configs", &index])
                    .write("delete query suggestions configurations"),
            )
            .await?;
        json_result("Query Suggestions Configuration Deleted", &res)
    }
}
