//! Collections toolset (Experiences API, `/1/collections`)

use super::handler::{json_result, McpToolHandler};
use super::helpers::{
    non_empty, optional_whole_number, parse_args, parse_json_arg, require_non_empty,
};
use crate::core::client::{Api, ApiRequest};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// All collections tools
pub fn handlers(services: &Arc<Services>) -> Vec<Arc<dyn McpToolHandler>> {
    let s = || Arc::clone(services);
    vec![
        Arc::new(ListCollectionsHandler::new(s())),
        Arc::new(GetCollectionHandler::new(s())),
        Arc::new(UpsertCollectionHandler::new(s())),
        Arc::new(DeleteCollectionHandler::new(s())),
        Arc::new(CommitCollectionHandler::new(s())),
    ]
}

fn id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": {
                "type": "string",
                "description": "Collection ID"
            }
        },
        "required": ["id"]
    })
}

#[derive(Deserialize)]
struct IdArgs {
    id: String,
}

impl IdArgs {
    fn parse(args: Value) -> Result<String, McpError> {
        let args: IdArgs = parse_args(args)?;
        require_non_empty("id", &args.id)?;
        Ok(args.id)
    }
}

pub struct ListCollectionsHandler {
    services: Arc<Services>,
}

impl ListCollectionsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for ListCollectionsHandler {
    fn name(&self) -> &str {
        "collections_list_collections"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "collections_list_collections".to_string(),
            description: "Retrieve a list of all collections".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "indexName": {
                        "type": "string",
                        "description": "Name of the index"
                    },
                    "offset": {
                        "type": "integer",
                        "description": "Number of items to skip (default to 0)"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Number of items per fetch (defaults to 10)"
                    },
                    "query": {
                        "type": "string",
                        "description": "Query to filter collections"
                    }
                },
                "required": ["indexName"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ListArgs {
            index_name: String,
            #[serde(default, deserialize_with = "optional_whole_number")]
            offset: Option<u64>,
            #[serde(default, deserialize_with = "optional_whole_number")]
            limit: Option<u64>,
            #[serde(default)]
            query: Option<String>,
        }

        let args: ListArgs = parse_args(args)?;
        require_non_empty("indexName", &args.index_name)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::get(Api::Experiences, &["1", "collections"])
                    .query("indexName", args.index_name)
                    .query_opt("offset", args.offset)
                    .query_opt("limit", args.limit)
                    .query_opt("query", non_empty(args.query)),
            )
            .await?;
        json_result("Collections", &res)
    }
}

pub struct GetCollectionHandler {
    services: Arc<Services>,
}

impl GetCollectionHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetCollectionHandler {
    fn name(&self) -> &str {
        "collections_get_collection"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "collections_get_collection".to_string(),
            description: "Retrieve a collection by its ID".to_string(),
            input_schema: id_schema(),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let id = IdArgs::parse(args)?;

        let res = self
            .services
            .client
            .send(ApiRequest::get(Api::Experiences, &["1", "collections", &id]))
            .await?;
        json_result("Collection", &res)
    }
}

pub struct UpsertCollectionHandler {
    services: Arc<Services>,
}

impl UpsertCollectionHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertArgs {
    index_name: String,
    name: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    add: Option<Value>,
    #[serde(default)]
    remove: Option<Value>,
    #[serde(default)]
    conditions: Option<Value>,
}

/// Optional JSON argument; absent, null and "" all count as missing
fn present(value: Option<Value>) -> Option<Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        other => other,
    }
}

impl UpsertArgs {
    fn body(self) -> Result<Value, McpError> {
        require_non_empty("indexName", &self.index_name)?;
        require_non_empty("name", &self.name)?;

        let mut body = Map::new();
        body.insert("indexName".to_string(), json!(self.index_name));
        body.insert("name".to_string(), json!(self.name));

        if let Some(id) = non_empty(self.id) {
            body.insert("id".to_string(), json!(id));
        }
        if let Some(description) = non_empty(self.description) {
            body.insert("description".to_string(), json!(description));
        }
        if let Some(add) = present(self.add) {
            let add: Vec<String> = parse_json_arg("add", add)?;
            body.insert("add".to_string(), json!(add));
        }
        if let Some(remove) = present(self.remove) {
            let remove: Vec<String> = parse_json_arg("remove", remove)?;
            body.insert("remove".to_string(), json!(remove));
        }
        if let Some(conditions) = present(self.conditions) {
            let conditions: Map<String, Value> = parse_json_arg("conditions", conditions)?;
            body.insert("conditions".to_string(), Value::Object(conditions));
        }

        Ok(Value::Object(body))
    }
}

#[async_trait]
impl McpToolHandler for UpsertCollectionHandler {
    fn name(&self) -> &str {
        "collections_upsert_collection"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "collections_upsert_collection".to_string(),
            description: "Upserts a collection".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": {
                        "type": "string",
                        "description": "Collection ID (optional for new collections)"
                    },
                    "indexName": {
                        "type": "string",
                        "description": "Name of the index"
                    },
                    "name": {
                        "type": "string",
                        "description": "Collection name"
                    },
                    "description": {
                        "type": "string",
                        "description": "Collection description"
                    },
                    "add": {
                        "type": "string",
                        "description": "JSON array of objectIDs to add to the collection"
                    },
                    "remove": {
                        "type": "string",
                        "description": "JSON array of objectIDs to remove from the collection"
                    },
                    "conditions": {
                        "type": "string",
                        "description": "JSON object with conditions to filter records"
                    }
                },
                "required": ["indexName", "name"]
            }),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: UpsertArgs = parse_args(args)?;
        let body = args.body()?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::post(Api::Experiences, &["1", "collections"])
                    .json(body)
                    .write("upsert collections"),
            )
            .await?;
        json_result("Collection Upserted", &res)
    }
}

pub struct DeleteCollectionHandler {
    services: Arc<Services>,
}

impl DeleteCollectionHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for DeleteCollectionHandler {
    fn name(&self) -> &str {
        "collections_delete_collection"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "collections_delete_collection".to_string(),
            description: "Soft deletes a collection by setting 'deleted' to true".to_string(),
            input_schema: id_schema(),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let id = IdArgs::parse(args)?;

        self.services
            .client
            .send(
                ApiRequest::delete(Api::Experiences, &["1", "collections", &id])
                    .write("delete collections"),
            )
            .await?;
        json_result("Collection Deleted", &json!({ "id": id, "deleted": true }))
    }
}

pub struct CommitCollectionHandler {
    services: Arc<Services>,
}

impl CommitCollectionHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for CommitCollectionHandler {
    fn name(&self) -> &str {
        "collections_commit_collection"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "collections_commit_collection".to_string(),
            description: "Evaluates the changes on a collection and replicates them to the index"
                .to_string(),
            input_schema: id_schema(),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let id = IdArgs::parse(args)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::post(Api::Experiences, &["1", "collections", &id, "commit"])
                    .write("commit collections"),
            )
            .await?;
        json_result("Collection Commit Started", &res)
    }
}
