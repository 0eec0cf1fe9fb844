//! Synonym tools

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
struct SynonymIdArgs {
    #[serde(rename = "objectID")]
    object_id: String,
    #[serde(default)]
    index_name: Option<String>,
}

fn synonym_id_schema(description: &str) -> Value {
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

pub struct GetSynonymHandler {
    services: Arc<Services>,
}

impl GetSynonymHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetSynonymHandler {
    fn name(&self) -> &str {
        "get_synonym"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_synonym".to_string(),
            description: "Get a synonym from the Algolia index by its ID".to_string(),
            input_schema: synonym_id_schema("The unique identifier of the synonym to retrieve"),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: SynonymIdArgs = parse_args(args)?;
        require_non_empty("objectID", &args.object_id)?;
        let index = resolve_index(&self.services, args.index_name)?;

        let res = self
            .services
            .client
            .send(ApiRequest::get(
                Api::Search,
                &["1", "indexes", &index, "synonyms", &args.object_id],
            ))
            .await?;
        json_result("synonym", &res)
    }
}

pub struct SearchSynonymsHandler {
    services: Arc<Services>,
}

impl SearchSynonymsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for SearchSynonymsHandler {
    fn name(&self) -> &str {
        "search_synonyms"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search_synonyms".to_string(),
            description: "Search for synonyms in the Algolia index that match a query. \
                         An empty query returns every synonym."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The query to find synonyms for"
                    },
                    "indexName": index_name_property()
                },
                "required": []
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct SearchSynonymsArgs {
            #[serde(default)]
            query: String,
            #[serde(default)]
            index_name: Option<String>,
        }

        let args: SearchSynonymsArgs = parse_args(args)?;
        let index = resolve_index(&self.services, args.index_name)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::post(
                    Api::Search,
                    &["1", "indexes", &index, "synonyms", "search"],
                )
                .json(json!({ "query": args.query })),
            )
            .await?;
        json_result("synonyms", &res)
    }
}

pub struct SaveSynonymHandler {
    services: Arc<Services>,
}

impl SaveSynonymHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for SaveSynonymHandler {
    fn name(&self) -> &str {
        "save_synonym"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "save_synonym".to_string(),
            description: "Save or update a synonym in the Algolia index".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "objectID": {
                        "type": "string",
                        "description": "The unique identifier of the synonym"
                    },
                    "synonym": {
                        "type": "string",
                        "description": "The synonym object as a JSON string. Examples: \
                            {\"objectID\":\"id\",\"type\":\"synonym\",\"synonyms\":[\"a\",\"b\"]}, \
                            {\"objectID\":\"id\",\"type\":\"oneWaySynonym\",\"input\":\"a\",\"synonyms\":[\"b\"]}, \
                            {\"objectID\":\"id\",\"type\":\"altCorrection1\",\"word\":\"a\",\"corrections\":[\"b\"]}, \
                            {\"objectID\":\"id\",\"type\":\"placeholder\",\"placeholder\":\"<p>\",\"replacements\":[\"a\"]}"
                    },
                    "indexName": index_name_property()
                },
                "required": ["objectID", "synonym"]
            }),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct SaveSynonymArgs {
            #[serde(rename = "objectID")]
            object_id: String,
            synonym: Value,
            #[serde(default)]
            index_name: Option<String>,
        }

        let args: SaveSynonymArgs = parse_args(args)?;
        require_non_empty("objectID", &args.object_id)?;
        let synonym: Map<String, Value> = parse_json_arg("synonym", args.synonym)?;
        let index = resolve_index(&self.services, args.index_name)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::put(
                    Api::Search,
                    &["1", "indexes", &index, "synonyms", &args.object_id],
                )
                .json(Value::Object(synonym))
                .write("save synonyms"),
            )
            .await?;
        json_result("task", &res)
    }
}

pub struct DeleteSynonymHandler {
    services: Arc<Services>,
}

impl DeleteSynonymHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for DeleteSynonymHandler {
    fn name(&self) -> &str {
        "delete_synonym"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_synonym".to_string(),
            description: "Delete a synonym by its object ID".to_string(),
            input_schema: synonym_id_schema("The object ID of the synonym to delete"),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: SynonymIdArgs = parse_args(args)?;
        require_non_empty("objectID", &args.object_id)?;
        let index = resolve_index(&self.services, args.index_name)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::delete(
                    Api::Search,
                    &["1", "indexes", &index, "synonyms", &args.object_id],
                )
                .write("delete synonyms"),
            )
            .await?;
        json_result("task", &res)
    }
}

pub struct ClearSynonymsHandler {
    services: Arc<Services>,
}

impl ClearSynonymsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for ClearSynonymsHandler {
    fn name(&self) -> &str {
        "clear_synonyms"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "clear_synonyms".to_string(),
            description: "Clear all synonyms from the Algolia index".to_string(),
            input_schema: index_only_schema(),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ClearArgs {
            #[serde(default)]
            index_name: Option<String>,
        }

        let args: ClearArgs = parse_args(args)?;
        let index = resolve_index(&self.services, args.index_name)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::post(Api::Search, &["1", "indexes", &index, "synonyms", "clear"])
                    .write("clear synonyms"),
            )
            .await?;
        json_result("clear result", &res)
    }
}
