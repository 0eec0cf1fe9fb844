//! Usage toolset (billing metrics)

use super::handler::{json_result, McpToolHandler};
use super::helpers::{
    non_empty, parse_args, require_csv, require_non_empty, validate_date, validate_timestamp,
};
use crate::core::client::{Api, ApiRequest};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// All usage tools
pub fn handlers(services: &Arc<Services>) -> Vec<Arc<dyn McpToolHandler>> {
    let s = || Arc::clone(services);
    vec![
        Arc::new(GetMetricsRegistryHandler::new(s())),
        Arc::new(GetDailyMetricsHandler::new(s())),
        Arc::new(GetHourlyMetricsHandler::new(s())),
    ]
}

/// Add one `name` parameter per requested metric
fn with_metric_names(mut request: ApiRequest, names: Vec<String>) -> ApiRequest {
    for name in names {
        request = request.query("name", name);
    }
    request
}

fn metric_names_property() -> Value {
    json!({
        "type": "string",
        "description": "Comma-separated list of metric names to retrieve"
    })
}

pub struct GetMetricsRegistryHandler {
    services: Arc<Services>,
}

impl GetMetricsRegistryHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetMetricsRegistryHandler {
    fn name(&self) -> &str {
        "usage_get_metrics_registry"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "usage_get_metrics_registry".to_string(),
            description: "Returns the list of available metrics".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "applications": {
                        "type": "string",
                        "description": "Comma-separated list of Algolia Application IDs"
                    }
                },
                "required": ["applications"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        struct RegistryArgs {
            applications: String,
        }

        let args: RegistryArgs = parse_args(args)?;
        let applications = require_csv("applications", &args.applications)?;

        let mut request = ApiRequest::get(Api::Usage, &["2", "metrics", "registry"]);
        for app in applications {
            request = request.query("application", app);
        }

        let res = self.services.client.send(request).await?;
        json_result("Metrics Registry", &res)
    }
}

pub struct GetDailyMetricsHandler {
    services: Arc<Services>,
}

impl GetDailyMetricsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyArgs {
    applications: String,
    start_date: String,
    #[serde(default)]
    end_date: Option<String>,
    metric_names: String,
}

impl DailyArgs {
    fn into_request(self) -> Result<ApiRequest, McpError> {
        let applications = require_csv("applications", &self.applications)?;
        let names = require_csv("metricNames", &self.metric_names)?;
        validate_date("startDate", &self.start_date)?;
        let end_date = non_empty(self.end_date);
        if let Some(end) = &end_date {
            validate_date("endDate", end)?;
            // ISO dates compare correctly as strings
            if self.start_date.as_str() > end.as_str() {
                return Err(McpError::InvalidParams(
                    "startDate must not be after endDate".to_string(),
                ));
            }
        }

        let mut request = ApiRequest::get(Api::Usage, &["2", "metrics", "daily"]);
        for app in applications {
            request = request.query("application", app);
        }
        request = request
            .query("startDate", self.start_date)
            .query_opt("endDate", end_date);
        Ok(with_metric_names(request, names))
    }
}

#[async_trait]
impl McpToolHandler for GetDailyMetricsHandler {
    fn name(&self) -> &str {
        "usage_get_daily_metrics"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "usage_get_daily_metrics".to_string(),
            description: "Returns a list of billing metrics per day for the specified applications"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "applications": {
                        "type": "string",
                        "description": "Comma-separated list of Algolia Application IDs"
                    },
                    "startDate": {
                        "type": "string",
                        "description": "The start date of the period for which the metrics should be returned (YYYY-MM-DD)"
                    },
                    "endDate": {
                        "type": "string",
                        "description": "The end date (included) of the period for which the metrics should be returned (YYYY-MM-DD)"
                    },
                    "metricNames": metric_names_property()
                },
                "required": ["applications", "startDate", "metricNames"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: DailyArgs = parse_args(args)?;
        let res = self.services.client.send(args.into_request()?).await?;
        json_result("Daily Metrics", &res)
    }
}

pub struct GetHourlyMetricsHandler {
    services: Arc<Services>,
}

impl GetHourlyMetricsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HourlyArgs {
    application: String,
    start_time: String,
    #[serde(default)]
    end_time: Option<String>,
    metric_names: String,
}

impl HourlyArgs {
    fn into_request(self) -> Result<ApiRequest, McpError> {
        require_non_empty("application", &self.application)?;
        let names = require_csv("metricNames", &self.metric_names)?;
        validate_timestamp("startTime", &self.start_time)?;
        let end_time = non_empty(self.end_time);
        if let Some(end) = &end_time {
            validate_timestamp("endTime", end)?;
        }

        let request = ApiRequest::get(Api::Usage, &["2", "metrics", "hourly"])
            .query("application", self.application)
            .query("startTime", self.start_time)
            .query_opt("endTime", end_time);
        Ok(with_metric_names(request, names))
    }
}

#[async_trait]
impl McpToolHandler for GetHourlyMetricsHandler {
    fn name(&self) -> &str {
        "usage_get_hourly_metrics"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "usage_get_hourly_metrics".to_string(),
            description: "Returns a list of billing metrics per hour for the specified application"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "application": {
                        "type": "string",
                        "description": "Algolia Application ID"
                    },
                    "startTime": {
                        "type": "string",
                        "description": "The start time of the period for which the metrics should be returned (ISO 8601 format)"
                    },
                    "endTime": {
                        "type": "string",
                        "description": "The end time (included) of the period for which the metrics should be returned (ISO 8601 format)"
                    },
                    "metricNames": metric_names_property()
                },
                "required": ["application", "startTime", "metricNames"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: HourlyArgs = parse_args(args)?;
        let res = self.services.client.send(args.into_request()?).await?;
        json_result("Hourly Metrics", &res)
    }
}
