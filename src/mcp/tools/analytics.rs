//! Analytics toolset (Analytics API, `/2/searches` and `/2/clicks`)
//!
//! Every tool takes an index and an optional `YYYY-MM-DD` date range.
//! Boolean flags are only sent when true.

use super::handler::{json_result, McpToolHandler};
use super::helpers::{
    non_empty, optional_whole_number, parse_args, require_non_empty, require_one_of,
    validate_date,
};
use crate::core::client::{Api, ApiRequest};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const ORDER_BY: &[&str] = &[
    "searchCount",
    "clickThroughRate",
    "conversionRate",
    "averageClickPosition",
];
const DIRECTIONS: &[&str] = &["asc", "desc"];
const MAX_LIMIT: u64 = 1000;

/// All analytics tools
pub fn handlers(services: &Arc<Services>) -> Vec<Arc<dyn McpToolHandler>> {
    let s = || Arc::clone(services);
    vec![
        Arc::new(GetSearchesCountHandler::new(s())),
        Arc::new(GetTopSearchesHandler::new(s())),
        Arc::new(GetClickThroughRateHandler::new(s())),
        Arc::new(GetNoResultsRateHandler::new(s())),
    ]
}

/// index + date range + tags, shared by every analytics tool
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeArgs {
    index: String,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    tags: Option<String>,
}

impl RangeArgs {
    /// Validate and turn into a GET request against `segments`
    fn into_request(self, segments: &[&str]) -> Result<ApiRequest, McpError> {
        require_non_empty("index", &self.index)?;

        let start_date = non_empty(self.start_date);
        let end_date = non_empty(self.end_date);
        if let Some(d) = &start_date {
            validate_date("startDate", d)?;
        }
        if let Some(d) = &end_date {
            validate_date("endDate", d)?;
        }
        if let (Some(start), Some(end)) = (&start_date, &end_date) {
            // ISO dates compare lexically
            if start > end {
                return Err(McpError::InvalidParams(
                    "startDate must not be after endDate".to_string(),
                ));
            }
        }

        Ok(ApiRequest::get(Api::Analytics, segments)
            .query("index", self.index)
            .query_opt("startDate", start_date)
            .query_opt("endDate", end_date)
            .query_opt("tags", non_empty(self.tags)))
    }
}

/// Input schema with the shared range properties plus `extra`
fn range_schema(extra: Value) -> Value {
    let mut properties = Map::new();
    properties.insert(
        "index".to_string(),
        json!({"type": "string", "description": "Index name"}),
    );
    properties.insert(
        "startDate".to_string(),
        json!({"type": "string", "description": "Start date of the period to analyze, in YYYY-MM-DD format"}),
    );
    properties.insert(
        "endDate".to_string(),
        json!({"type": "string", "description": "End date of the period to analyze, in YYYY-MM-DD format"}),
    );
    properties.insert(
        "tags".to_string(),
        json!({"type": "string", "description": "Tags by which to segment the analytics"}),
    );
    if let Value::Object(extra) = extra {
        properties.extend(extra);
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": ["index"]
    })
}

pub struct GetSearchesCountHandler {
    services: Arc<Services>,
}

impl GetSearchesCountHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetSearchesCountHandler {
    fn name(&self) -> &str {
        "analytics_get_searches_count"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "analytics_get_searches_count".to_string(),
            description:
                "Retrieve the number of searches within a time range, including a daily breakdown"
                    .to_string(),
            input_schema: range_schema(json!({})),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: RangeArgs = parse_args(args)?;
        let request = args.into_request(&["2", "searches", "count"])?;

        let res = self.services.client.send(request).await?;
        json_result("Searches Count", &res)
    }
}

pub struct GetTopSearchesHandler {
    services: Arc<Services>,
}

impl GetTopSearchesHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetTopSearchesHandler {
    fn name(&self) -> &str {
        "analytics_get_top_searches"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "analytics_get_top_searches".to_string(),
            description: "Retrieve the most popular searches for an index".to_string(),
            input_schema: range_schema(json!({
                "clickAnalytics": {
                    "type": "boolean",
                    "description": "Whether to include metrics related to click and conversion events in the response"
                },
                "revenueAnalytics": {
                    "type": "boolean",
                    "description": "Whether to include metrics related to revenue events in the response"
                },
                "orderBy": {
                    "type": "string",
                    "enum": ORDER_BY,
                    "description": "Attribute by which to order the response items"
                },
                "direction": {
                    "type": "string",
                    "enum": DIRECTIONS,
                    "description": "Sorting direction of the results: asc or desc"
                },
                "limit": {
                    "type": "integer",
                    "description": "Number of items to return (max 1000)",
                    "maximum": MAX_LIMIT
                },
                "offset": {
                    "type": "integer",
                    "description": "Position of the first item to return"
                }
            })),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct TopSearchesArgs {
            #[serde(flatten)]
            range: RangeArgs,
            #[serde(default)]
            click_analytics: bool,
            #[serde(default)]
            revenue_analytics: bool,
            #[serde(default)]
            order_by: Option<String>,
            #[serde(default)]
            direction: Option<String>,
            #[serde(default, deserialize_with = "optional_whole_number")]
            limit: Option<u64>,
            #[serde(default, deserialize_with = "optional_whole_number")]
            offset: Option<u64>,
        }

        let args: TopSearchesArgs = parse_args(args)?;

        let order_by = non_empty(args.order_by);
        if let Some(o) = &order_by {
            require_one_of("orderBy", o, ORDER_BY)?;
        }
        let direction = non_empty(args.direction);
        if let Some(d) = &direction {
            require_one_of("direction", d, DIRECTIONS)?;
        }
        if args.limit.is_some_and(|l| l > MAX_LIMIT) {
            return Err(McpError::InvalidParams(format!(
                "limit cannot exceed {MAX_LIMIT}"
            )));
        }

        let mut request = args.range.into_request(&["2", "searches"])?;
        if args.click_analytics {
            request = request.query("clickAnalytics", "true");
        }
        if args.revenue_analytics {
            request = request.query("revenueAnalytics", "true");
        }
        let request = request
            .query_opt("orderBy", order_by)
            .query_opt("direction", direction)
            .query_opt("limit", args.limit)
            .query_opt("offset", args.offset);

        let res = self.services.client.send(request).await?;
        json_result("Top Searches", &res)
    }
}

pub struct GetClickThroughRateHandler {
    services: Arc<Services>,
}

impl GetClickThroughRateHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetClickThroughRateHandler {
    fn name(&self) -> &str {
        "analytics_get_click_through_rate"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "analytics_get_click_through_rate".to_string(),
            description: "Retrieve the click-through rate for all searches with at least one click event, including a daily breakdown"
                .to_string(),
            input_schema: range_schema(json!({})),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: RangeArgs = parse_args(args)?;
        let request = args.into_request(&["2", "clicks", "clickThroughRate"])?;

        let res = self.services.client.send(request).await?;
        json_result("Click Through Rate", &res)
    }
}

pub struct GetNoResultsRateHandler {
    services: Arc<Services>,
}

impl GetNoResultsRateHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetNoResultsRateHandler {
    fn name(&self) -> &str {
        "analytics_get_no_results_rate"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "analytics_get_no_results_rate".to_string(),
            description: "Retrieve the fraction of searches that didn't return any results, including a daily breakdown"
                .to_string(),
            input_schema: range_schema(json!({})),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: RangeArgs = parse_args(args)?;
        let request = args.into_request(&["2", "searches", "noResultRate"])?;

        let res = self.services.client.send(request).await?;
        json_result("No Results Rate", &res)
    }
}
