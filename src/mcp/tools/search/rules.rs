//! Rule tools: search_rules and delete_rule

use super::index_name_property;
use crate::core::client::{Api, ApiRequest};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use crate::mcp::tools::handler::{json_result, McpToolHandler};
use crate::mcp::tools::helpers::{
    non_empty, parse_args, require_non_empty, require_one_of, resolve_index,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const ANCHORING: &[&str] = &["is", "contains", "startsWith", "endsWith"];

pub struct SearchRulesHandler {
    services: Arc<Services>,
}

impl SearchRulesHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for SearchRulesHandler {
    fn name(&self) -> &str {
        "search_rules"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search_rules".to_string(),
            description: "Search for rules in the Algolia index".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The query to search for"
                    },
                    "anchoring": {
                        "type": "string",
                        "enum": ANCHORING,
                        "description": "When specified, restricts matches to rules with a specific anchoring type. When omitted, all anchoring types may match."
                    },
                    "context": {
                        "type": "string",
                        "description": "When specified, restricts matches to contextual rules with a specific context. When omitted, all contexts may match."
                    },
                    "enabled": {
                        "type": "boolean",
                        "description": "When specified, restricts matches to rules with a specific enabled status. When omitted, all enabled statuses may match."
                    },
                    "indexName": index_name_property()
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct SearchRulesArgs {
            query: String,
            #[serde(default)]
            anchoring: Option<String>,
            #[serde(default)]
            context: Option<String>,
            #[serde(default)]
            enabled: Option<bool>,
            #[serde(default)]
            index_name: Option<String>,
        }

        let args: SearchRulesArgs = parse_args(args)?;

        let mut body = Map::new();
        body.insert("query".to_string(), json!(args.query));
        if let Some(anchoring) = non_empty(args.anchoring) {
            require_one_of("anchoring", &anchoring, ANCHORING)?;
            body.insert("anchoring".to_string(), json!(anchoring));
        }
        if let Some(context) = non_empty(args.context) {
            body.insert("context".to_string(), json!(context));
        }
        if let Some(enabled) = args.enabled {
            body.insert("enabled".to_string(), json!(enabled));
        }

        let index = resolve_index(&self.services, args.index_name)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::post(Api::Search, &["1", "indexes", &index, "rules", "search"])
                    .json(Value::Object(body)),
            )
            .await?;
        json_result("rules", &res)
    }
}

pub struct DeleteRuleHandler {
    services: Arc<Services>,
}

impl DeleteRuleHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for DeleteRuleHandler {
    fn name(&self) -> &str {
        "delete_rule"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "delete_rule".to_string(),
            description: "Delete a rule by its object ID".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "objectID": {
                        "type": "string",
                        "description": "The object ID of the rule to delete"
                    },
                    "indexName": index_name_property()
                },
                "required": ["objectID"]
            }),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct DeleteRuleArgs {
            #[serde(rename = "objectID")]
            object_id: String,
            #[serde(default)]
            index_name: Option<String>,
        }

        let args: DeleteRuleArgs = parse_args(args)?;
        require_non_empty("objectID", &args.object_id)?;
        let index = resolve_index(&self.services, args.index_name)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::delete(
                    Api::Search,
                    &["1", "indexes", &index, "rules", &args.object_id],
                )
                .write("delete rules"),
            )
            .await?;
        json_result("task", &res)
    }
}
