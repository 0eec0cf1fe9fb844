//! Recommend toolset (Search host, Recommend endpoints)

use super::handler::{json_result, McpToolHandler};
use super::helpers::{
    non_empty, optional_whole_number, parse_args, parse_json_arg, require_non_empty,
    require_one_of, whole_number,
};
use crate::core::client::{Api, ApiRequest};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const MODELS: &[&str] = &[
    "related-products",
    "bought-together",
    "trending-facets",
    "trending-items",
    "looking-similar",
];

/// Models that recommend without a reference item
const TRENDING_MODELS: &[&str] = &["trending-facets", "trending-items"];

/// All recommend tools
pub fn handlers(services: &Arc<Services>) -> Vec<Arc<dyn McpToolHandler>> {
    let s = || Arc::clone(services);
    vec![
        Arc::new(GetRecommendationsHandler::new(s())),
        Arc::new(GetRecommendRuleHandler::new(s())),
        Arc::new(SearchRecommendRulesHandler::new(s())),
        Arc::new(GetRecommendStatusHandler::new(s())),
        Arc::new(BatchRecommendRulesHandler::new(s())),
        Arc::new(DeleteRecommendRuleHandler::new(s())),
    ]
}

/// Schema properties every rule tool shares, plus `extra`
fn model_schema(extra: Value, required: &[&str]) -> Value {
    let mut properties = json!({
        "indexName": {
            "type": "string",
            "description": "Name of the index on which to perform the operation"
        },
        "model": {
            "type": "string",
            "enum": MODELS,
            "description": "Recommend model (related-products, bought-together, trending-facets, trending-items, looking-similar)"
        }
    });
    if let (Some(props), Value::Object(extra)) = (properties.as_object_mut(), extra) {
        props.extend(extra);
    }

    let mut all_required = vec!["indexName", "model"];
    all_required.extend_from_slice(required);

    json!({
        "type": "object",
        "properties": properties,
        "required": all_required
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelArgs {
    index_name: String,
    model: String,
}

impl ModelArgs {
    fn validate(&self) -> Result<(), McpError> {
        require_non_empty("indexName", &self.index_name)?;
        require_one_of("model", &self.model, MODELS)
    }
}

/// Check the required fields of one recommendation request
fn validate_recommendation_request(i: usize, request: &Value) -> Result<(), McpError> {
    let missing = |field: &str| {
        McpError::InvalidParams(format!("request at index {i}: {field} is required"))
    };
    let text = |field: &str| {
        request
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    if !request.is_object() {
        return Err(McpError::InvalidParams(format!(
            "request at index {i} must be a JSON object"
        )));
    }
    text("indexName").ok_or_else(|| missing("indexName"))?;
    let model = text("model").ok_or_else(|| missing("model"))?;
    require_one_of("model", model, MODELS)?;
    if !request.get("threshold").is_some_and(Value::is_number) {
        return Err(missing("threshold"));
    }
    if !TRENDING_MODELS.contains(&model) {
        text("objectID").ok_or_else(|| missing("objectID"))?;
    }
    Ok(())
}

pub struct GetRecommendationsHandler {
    services: Arc<Services>,
}

impl GetRecommendationsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetRecommendationsHandler {
    fn name(&self) -> &str {
        "recommend_get_recommendations"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "recommend_get_recommendations".to_string(),
            description: "Retrieve recommendations from selected AI models".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "requests": {
                        "type": "string",
                        "description": "JSON array of recommendation requests. Each request must include 'indexName', 'model', 'threshold', and an 'objectID' unless the model is trending-items or trending-facets."
                    }
                },
                "required": ["requests"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        struct RecommendationsArgs {
            requests: Value,
        }

        let args: RecommendationsArgs = parse_args(args)?;
        let requests: Vec<Value> = parse_json_arg("requests", args.requests)?;
        if requests.is_empty() {
            return Err(McpError::InvalidParams(
                "requests cannot be empty".to_string(),
            ));
        }
        for (i, request) in requests.iter().enumerate() {
            validate_recommendation_request(i, request)?;
        }

        let res = self
            .services
            .client
            .send(
                ApiRequest::post(Api::Search, &["1", "indexes", "*", "recommendations"])
                    .json(json!({ "requests": requests })),
            )
            .await?;
        json_result("Recommendations", &res)
    }
}

pub struct GetRecommendRuleHandler {
    services: Arc<Services>,
}

impl GetRecommendRuleHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[derive(Deserialize)]
struct RuleArgs {
    #[serde(flatten)]
    target: ModelArgs,
    #[serde(rename = "objectID")]
    object_id: String,
}

impl RuleArgs {
    fn parse(args: Value) -> Result<Self, McpError> {
        let args: RuleArgs = parse_args(args)?;
        args.target.validate()?;
        require_non_empty("objectID", &args.object_id)?;
        Ok(args)
    }
}

fn object_id_property() -> Value {
    json!({
        "objectID": {
            "type": "string",
            "description": "Unique record identifier"
        }
    })
}

#[async_trait]
impl McpToolHandler for GetRecommendRuleHandler {
    fn name(&self) -> &str {
        "recommend_get_recommend_rule"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "recommend_get_recommend_rule".to_string(),
            description: "Retrieve a Recommend rule that you previously created in the Algolia dashboard"
                .to_string(),
            input_schema: model_schema(object_id_property(), &["objectID"]),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args = RuleArgs::parse(args)?;

        let res = self
            .services
            .client
            .send(ApiRequest::get(
                Api::Search,
                &[
                    "1",
                    "indexes",
                    &args.target.index_name,
                    &args.target.model,
                    "recommend",
                    "rules",
                    &args.object_id,
                ],
            ))
            .await?;
        json_result("Recommend Rule", &res)
    }
}

pub struct SearchRecommendRulesHandler {
    services: Arc<Services>,
}

impl SearchRecommendRulesHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchRulesArgs {
    #[serde(flatten)]
    target: ModelArgs,
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    context: Option<String>,
    #[serde(default, deserialize_with = "optional_whole_number")]
    page: Option<u64>,
    #[serde(default, deserialize_with = "optional_whole_number")]
    hits_per_page: Option<u64>,
    #[serde(default)]
    enabled: Option<bool>,
    #[serde(default)]
    filters: Option<String>,
}

impl SearchRulesArgs {
    fn body(self) -> Value {
        let mut body = Map::new();
        body.insert("query".to_string(), json!(self.query.unwrap_or_default()));
        if let Some(context) = non_empty(self.context) {
            body.insert("context".to_string(), json!(context));
        }
        if let Some(page) = self.page {
            body.insert("page".to_string(), json!(page));
        }
        if let Some(hits) = self.hits_per_page {
            body.insert("hitsPerPage".to_string(), json!(hits));
        }
        if let Some(enabled) = self.enabled {
            body.insert("enabled".to_string(), json!(enabled));
        }
        if let Some(filters) = non_empty(self.filters) {
            body.insert("filters".to_string(), json!(filters));
        }
        Value::Object(body)
    }
}

#[async_trait]
impl McpToolHandler for SearchRecommendRulesHandler {
    fn name(&self) -> &str {
        "recommend_search_recommend_rules"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "recommend_search_recommend_rules".to_string(),
            description: "Search for Recommend rules. Use an empty query to list all rules for this recommendation scenario."
                .to_string(),
            input_schema: model_schema(
                json!({
                    "query": {
                        "type": "string",
                        "description": "Search query"
                    },
                    "context": {
                        "type": "string",
                        "description": "Only search for rules with matching context"
                    },
                    "page": {
                        "type": "integer",
                        "description": "Requested page of the API response"
                    },
                    "hitsPerPage": {
                        "type": "integer",
                        "description": "Maximum number of hits per page"
                    },
                    "enabled": {
                        "type": "boolean",
                        "description": "Whether to only show rules where the value of their 'enabled' property matches this parameter"
                    },
                    "filters": {
                        "type": "string",
                        "description": "Filter expression. This only searches for rules matching the filter expression"
                    }
                }),
                &[],
            ),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: SearchRulesArgs = parse_args(args)?;
        args.target.validate()?;
        let index = args.target.index_name.clone();
        let model = args.target.model.clone();

        let res = self
            .services
            .client
            .send(
                ApiRequest::post(
                    Api::Search,
                    &["1", "indexes", &index, &model, "recommend", "rules", "search"],
                )
                .json(args.body()),
            )
            .await?;
        json_result("Recommend Rules Search", &res)
    }
}

pub struct GetRecommendStatusHandler {
    services: Arc<Services>,
}

impl GetRecommendStatusHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetRecommendStatusHandler {
    fn name(&self) -> &str {
        "recommend_get_recommend_status"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "recommend_get_recommend_status".to_string(),
            description: "Check the status of a given task".to_string(),
            input_schema: model_schema(
                json!({
                    "taskID": {
                        "type": "integer",
                        "description": "Unique task identifier"
                    }
                }),
                &["taskID"],
            ),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        struct StatusArgs {
            #[serde(flatten)]
            target: ModelArgs,
            #[serde(rename = "taskID", deserialize_with = "whole_number")]
            task_id: u64,
        }

        let args: StatusArgs = parse_args(args)?;
        args.target.validate()?;
        let task_id = args.task_id.to_string();

        let res = self
            .services
            .client
            .send(ApiRequest::get(
                Api::Search,
                &[
                    "1",
                    "indexes",
                    &args.target.index_name,
                    &args.target.model,
                    "task",
                    &task_id,
                ],
            ))
            .await?;
        json_result("Recommend Task Status", &res)
    }
}

pub struct BatchRecommendRulesHandler {
    services: Arc<Services>,
}

impl BatchRecommendRulesHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for BatchRecommendRulesHandler {
    fn name(&self) -> &str {
        "recommend_batch_recommend_rules"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "recommend_batch_recommend_rules".to_string(),
            description: "Create or update a batch of Recommend Rules".to_string(),
            input_schema: model_schema(
                json!({
                    "rules": {
                        "type": "string",
                        "description": "JSON array of Recommend rules to create or update"
                    },
                    "clearExistingRules": {
                        "type": "boolean",
                        "description": "Whether to replace all existing rules with the provided batch"
                    }
                }),
                &["rules"],
            ),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct BatchArgs {
            #[serde(flatten)]
            target: ModelArgs,
            rules: Value,
            #[serde(default)]
            clear_existing_rules: bool,
        }

        let args: BatchArgs = parse_args(args)?;
        args.target.validate()?;
        let rules: Vec<Value> = parse_json_arg("rules", args.rules)?;

        let mut request = ApiRequest::post(
            Api::Search,
            &[
                "1",
                "indexes",
                &args.target.index_name,
                &args.target.model,
                "recommend",
                "rules",
                "batch",
            ],
        )
        .json(Value::Array(rules))
        .write("save recommend rules");
        if args.clear_existing_rules {
            request = request.query("clearExistingRules", true);
        }

        let res = self.services.client.send(request).await?;
        json_result("Recommend Rules Batch", &res)
    }
}

pub struct DeleteRecommendRuleHandler {
    services: Arc<Services>,
}

impl DeleteRecommendRuleHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for DeleteRecommendRuleHandler {
    fn name(&self) -> &str {
        "recommend_delete_recommend_rule"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "recommend_delete_recommend_rule".to_string(),
            description: "Delete a Recommend rule from a recommendation scenario".to_string(),
            input_schema: model_schema(object_id_property(), &["objectID"]),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args = RuleArgs::parse(args)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::delete(
                    Api::Search,
                    &[
                        "1",
                        "indexes",
                        &args.target.index_name,
                        &args.target.model,
                        "recommend",
                        "rules",
                        &args.object_id,
                    ],
                )
                .write("delete recommend rules"),
            )
            .await?;
        json_result("Recommend Rule Deleted", &res)
    }
}
