//! A/B testing toolset (Analytics API, `/2/abtests`)

use super::handler::{json_result, McpToolHandler};
use super::helpers::{
    non_empty, optional_whole_number, parse_args, parse_json_arg, require_non_empty,
    validate_timestamp, whole_number,
};
use crate::core::client::{Api, ApiRequest};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const VARIANTS_DESCRIPTION: &str = "A/B test variants as JSON array (exactly 2 variants required). \
    Each variant must have 'index' and 'trafficPercentage' fields, and may optionally have \
    'description' and 'customSearchParameters' fields.";

/// All A/B testing tools
pub fn handlers(services: &Arc<Services>) -> Vec<Arc<dyn McpToolHandler>> {
    let s = || Arc::clone(services);
    vec![
        Arc::new(ListAbTestsHandler::new(s())),
        Arc::new(GetAbTestHandler::new(s())),
        Arc::new(CreateAbTestHandler::new(s())),
        Arc::new(ScheduleAbTestHandler::new(s())),
        Arc::new(EstimateAbTestHandler::new(s())),
        Arc::new(StopAbTestHandler::new(s())),
        Arc::new(DeleteAbTestHandler::new(s())),
    ]
}

/// Decode the variants argument; the API takes exactly two
fn parse_variants(value: Value) -> Result<Vec<Value>, McpError> {
    let variants: Vec<Value> = parse_json_arg("variants", value)?;
    if variants.len() != 2 {
        return Err(McpError::InvalidParams(
            "exactly 2 variants are required".to_string(),
        ));
    }
    Ok(variants)
}

fn id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": {
                "type": "integer",
                "description": "Unique A/B test identifier"
            }
        },
        "required": ["id"]
    })
}

#[derive(Deserialize)]
struct IdArgs {
    #[serde(deserialize_with = "whole_number")]
    id: u64,
}

pub struct ListAbTestsHandler {
    services: Arc<Services>,
}

impl ListAbTestsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for ListAbTestsHandler {
    fn name(&self) -> &str {
        "abtesting_list_abtests"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "abtesting_list_abtests".to_string(),
            description: "List all A/B tests configured for this application".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "offset": {
                        "type": "integer",
                        "description": "Position of the first item to return"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Number of items to return"
                    },
                    "indexPrefix": {
                        "type": "string",
                        "description": "Index name prefix. Only A/B tests for indices starting with this string are included in the response"
                    },
                    "indexSuffix": {
                        "type": "string",
                        "description": "Index name suffix. Only A/B tests for indices ending with this string are included in the response"
                    }
                },
                "required": []
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ListArgs {
            #[serde(default, deserialize_with = "optional_whole_number")]
            offset: Option<u64>,
            #[serde(default, deserialize_with = "optional_whole_number")]
            limit: Option<u64>,
            #[serde(default)]
            index_prefix: Option<String>,
            #[serde(default)]
            index_suffix: Option<String>,
        }

        let args: ListArgs = parse_args(args)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::get(Api::Analytics, &["2", "abtests"])
                    .query_opt("offset", args.offset)
                    .query_opt("limit", args.limit)
                    .query_opt("indexPrefix", non_empty(args.index_prefix))
                    .query_opt("indexSuffix", non_empty(args.index_suffix)),
            )
            .await?;
        json_result("AB Tests", &res)
    }
}

pub struct GetAbTestHandler {
    services: Arc<Services>,
}

impl GetAbTestHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetAbTestHandler {
    fn name(&self) -> &str {
        "abtesting_get_abtest"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "abtesting_get_abtest".to_string(),
            description: "Retrieve the details for an A/B test by its ID".to_string(),
            input_schema: id_schema(),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: IdArgs = parse_args(args)?;
        let id = args.id.to_string();

        let res = self
            .services
            .client
            .send(ApiRequest::get(Api::Analytics, &["2", "abtests", &id]))
            .await?;
        json_result(&format!("AB Test {id}"), &res)
    }
}

pub struct CreateAbTestHandler {
    services: Arc<Services>,
}

impl CreateAbTestHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for CreateAbTestHandler {
    fn name(&self) -> &str {
        "abtesting_create_abtest"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "abtesting_create_abtest".to_string(),
            description: "Create a new A/B test".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "A/B test name"
                    },
                    "endAt": {
                        "type": "string",
                        "description": "End date and time of the A/B test, in RFC 3339 format (e.g., 2023-06-17T00:00:00Z)"
                    },
                    "variants": {
                        "type": "string",
                        "description": VARIANTS_DESCRIPTION
                    }
                },
                "required": ["name", "endAt", "variants"]
            }),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct CreateArgs {
            name: String,
            end_at: String,
            variants: Value,
        }

        let args: CreateArgs = parse_args(args)?;
        require_non_empty("name", &args.name)?;
        validate_timestamp("endAt", &args.end_at)?;
        let variants = parse_variants(args.variants)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::post(Api::Analytics, &["2", "abtests"])
                    .json(json!({
                        "name": args.name,
                        "endAt": args.end_at,
                        "variants": variants,
                    }))
                    .write("create A/B tests"),
            )
            .await?;
        json_result("AB Test Created", &res)
    }
}

pub struct ScheduleAbTestHandler {
    services: Arc<Services>,
}

impl ScheduleAbTestHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for ScheduleAbTestHandler {
    fn name(&self) -> &str {
        "abtesting_schedule_abtest"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "abtesting_schedule_abtest".to_string(),
            description: "Schedule an A/B test to be started at a later time".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "A/B test name"
                    },
                    "scheduledAt": {
                        "type": "string",
                        "description": "Date and time when the A/B test is scheduled to start, in RFC 3339 format (e.g., 2023-06-15T15:06:44.400601Z)"
                    },
                    "endAt": {
                        "type": "string",
                        "description": "End date and time of the A/B test, in RFC 3339 format (e.g., 2023-06-17T00:00:00Z)"
                    },
                    "variants": {
                        "type": "string",
                        "description": VARIANTS_DESCRIPTION
                    }
                },
                "required": ["name", "scheduledAt", "endAt", "variants"]
            }),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct ScheduleArgs {
            name: String,
            scheduled_at: String,
            end_at: String,
            variants: Value,
        }

        let args: ScheduleArgs = parse_args(args)?;
        require_non_empty("name", &args.name)?;
        validate_timestamp("scheduledAt", &args.scheduled_at)?;
        validate_timestamp("endAt", &args.end_at)?;
        let variants = parse_variants(args.variants)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::post(Api::Analytics, &["2", "abtests", "schedule"])
                    .json(json!({
                        "name": args.name,
                        "scheduledAt": args.scheduled_at,
                        "endAt": args.end_at,
                        "variants": variants,
                    }))
                    .write("schedule A/B tests"),
            )
            .await?;
        json_result("AB Test Scheduled", &res)
    }
}

pub struct EstimateAbTestHandler {
    services: Arc<Services>,
}

impl EstimateAbTestHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for EstimateAbTestHandler {
    fn name(&self) -> &str {
        "abtesting_estimate_abtest"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "abtesting_estimate_abtest".to_string(),
            description:
                "Estimate the sample size and duration of an A/B test based on historical traffic"
                    .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "variants": {
                        "type": "string",
                        "description": VARIANTS_DESCRIPTION
                    },
                    "configuration": {
                        "type": "string",
                        "description": "A/B test configuration as JSON object. Must include 'minimumDetectableEffect' with 'size' and 'metric' fields. May optionally include 'outliers' and 'emptySearch' settings."
                    }
                },
                "required": ["variants", "configuration"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        struct EstimateArgs {
            variants: Value,
            configuration: Value,
        }

        let args: EstimateArgs = parse_args(args)?;
        let variants = parse_variants(args.variants)?;
        let configuration: Map<String, Value> =
            parse_json_arg("configuration", args.configuration)?;

        if !configuration.contains_key("minimumDetectableEffect") {
            return Err(McpError::InvalidParams(
                "configuration must include 'minimumDetectableEffect'".to_string(),
            ));
        }

        let res = self
            .services
            .client
            .send(
                ApiRequest::post(Api::Analytics, &["2", "abtests", "estimate"]).json(json!({
                    "configuration": configuration,
                    "variants": variants,
                })),
            )
            .await?;
        json_result("AB Test Estimate", &res)
    }
}

pub struct StopAbTestHandler {
    services: Arc<Services>,
}

impl StopAbTestHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for StopAbTestHandler {
    fn name(&self) -> &str {
        "abtesting_stop_abtest"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "abtesting_stop_abtest".to_string(),
            description: "Stop an A/B test by its ID. You can't restart stopped A/B tests."
                .to_string(),
            input_schema: id_schema(),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: IdArgs = parse_args(args)?;
        let id = args.id.to_string();

        let res = self
            .services
            .client
            .send(
                ApiRequest::post(Api::Analytics, &["2", "abtests", &id, "stop"])
                    .write("stop A/B tests"),
            )
            .await?;
        json_result(&format!("AB Test {id} Stopped"), &res)
    }
}

pub struct DeleteAbTestHandler {
    services: Arc<Services>,
}

impl DeleteAbTestHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for DeleteAbTestHandler {
    fn name(&self) -> &str {
        "abtesting_delete_abtest"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "abtesting_delete_abtest".to_string(),
            description: "Delete an A/B test by its ID".to_string(),
            input_schema: id_schema(),
        }
    }

    fn is_write(&self) -> bool {
        true
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: IdArgs = parse_args(args)?;
        let id = args.id.to_string();

        let res = self
            .services
            .client
            .send(
                ApiRequest::delete(Api::Analytics, &["2", "abtests", &id])
                    .write("delete A/B tests"),
            )
            .await?;
        json_result(&format!("AB Test {id} Deleted"), &res)
    }
}
