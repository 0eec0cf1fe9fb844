//! Record tools: get, insert (single and batch) and delete objects

use super::index_name_property;
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
struct ObjectIdArgs {
    #[serde(rename = "objectID")]
    object_id: String,
    #[serde(default)]
    index_name: Option<String>,
}

fn object_id_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "objectID": {
                "type": "string",
                "description": description
            },
            "indexName": index_name_property()
        },
        "required": ["objectID"]
    })
}

/// objectID of a record as a path segment. Numbers are accepted too.
fn record_object_id(record: &Map<String, Value>) -> Option<String> {
    match record.get("objectID") {
        Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

pub struct GetObjectHandler {
    services: Arc<Services>,
}

impl GetObjectHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetObjectHandler {
    fn name(&self) -> &str {
        "get_object"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_object".to_string(),
            description: "Get an object by its object ID".to_string(),
            input_schema: object_id_schema("The object ID to look up"),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: ObjectIdArgs = parse_args(args)?;
        require_non_empty("objectID", &args.object_id)?;
        let index = resolve_index(&self.services, args.index_name)?;

        let res = self
            .services
            .client
            .send(ApiRequest::get(
                Api::Search,
                &["1", "indexes", &index, &args.object_id],
            ))
            .await?;
        json_result("object", &res)
    }
}

pub struct InsertObjectHandler {
    services: Arc<Services>,
}

impl InsertObjectHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for InsertObjectHandler {
    fn name(&self) -> &str {
        "insert_object"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "insert_object".to_string(),
            description: "Insert or update an object in the Algolia index".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "object": {
                        "type": "string",
                        "description": "The object to insert or update as a JSON string (must include an objectID field)"
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
        struct InsertArgs {
            object: Value,
            #[serde(default)]
            index_name: Option<String>,
        }

        let args: InsertArgs = parse_args(args)?;
        let record: Map<String, Value> = parse_json_arg("object", args.object)?;
        let object_id = record_object_id(&record).ok_or_else(|| {
            McpError::InvalidParams("object must include an objectID field".to_string())
        })?;
        let index = resolve_index(&self.services, args.index_name)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::put(Api::Search, &["1", "indexes", &index, &object_id])
                    .json(Value::Object(record))
                    .write("insert objects"),
            )
            .await?;
        json_result("insert result", &res)
    }
}

pub struct InsertObjectsHandler {
    services: Arc<Services>,
}

impl InsertObjectsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for InsertObjectsHandler {
    fn name(&self) -> &str {
        "insert_objects"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "insert_objects".to_string(),
            description: "Insert or update multiple objects in the Algolia index".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "objects": {
                        "type": "string",
                        "description": "Array of objects to insert or update as a JSON string (each must include an objectID field)"
                    },
                    "indexName": index_name_property()
                },
                "required": ["objects"]
            }),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct InsertManyArgs {
            objects: Value,
            #[serde(default)]
            index_name: Option<String>,
        }

        let args: InsertManyArgs = parse_args(args)?;
        let records: Vec<Map<String, Value>> = parse_json_arg("objects", args.objects)?;

        if records.is_empty() {
            return Err(McpError::InvalidParams(
                "objects must contain at least one object".to_string(),
            ));
        }
        for (i, record) in records.iter().enumerate() {
            if record_object_id(record).is_none() {
                return Err(McpError::InvalidParams(format!(
                    "object at index {i} must include an objectID field"
                )));
            }
        }
        let index = resolve_index(&self.services, args.index_name)?;

        let requests: Vec<Value> = records
            .into_iter()
            .map(|record| json!({ "action": "updateObject", "body": record }))
            .collect();

        let res = self
            .services
            .client
            .send(
                ApiRequest::post(Api::Search, &["1", "indexes", &index, "batch"])
                    .json(json!({ "requests": requests }))
                    .write("insert objects"),
            )
            .await?;
        json_result("batch insert result", &res)
    }
}

pub struct DeleteObjectHandler {
    services: Arc<Services>,
}

impl DeleteObjectHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for DeleteObjectHandler {
    fn name(&self) -> &str {
        "delete_object"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_object".to_string(),
            description: "Delete an object by its object ID".to_string(),
            input_schema: object_id_schema("The object ID to delete"),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: ObjectIdArgs = parse_args(args)?;
        require_non_empty("objectID", &args.object_id)?;
        let index = resolve_index(&self.services, args.index_name)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::delete(Api::Search, &["1", "indexes", &index, &args.object_id])
                    .write("delete objects"),
            )
            .await?;
        json_result("task", &res)
    }
}
