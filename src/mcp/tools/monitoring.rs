//! Monitoring toolset (Status API)
//!
//! Cluster status, incidents, indexing time and reachability are
//! public. Infrastructure metrics need the application credentials.

use super::handler::{json_result, McpToolHandler};
use super::helpers::{parse_args, require_csv, require_one_of};
use crate::core::client::{Api, ApiRequest};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const METRICS: &[&str] = &[
    "avg_build_time",
    "ssd_usage",
    "ram_search_usage",
    "ram_indexing_usage",
    "cpu_usage",
    "*",
];
const PERIODS: &[&str] = &["minute", "hour", "day", "week", "month"];

/// All monitoring tools
pub fn handlers(services: &Arc<Services>) -> Vec<Arc<dyn McpToolHandler>> {
    let s = || Arc::clone(services);
    vec![
        Arc::new(GetClustersStatusHandler::new(s())),
        Arc::new(GetIncidentsHandler::new(s())),
        Arc::new(GetIndexingTimeHandler::new(s())),
        Arc::new(GetReachabilityHandler::new(s())),
        Arc::new(GetMetricsHandler::new(s())),
    ]
}

fn no_args_schema() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

fn clusters_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "clusters": {
                "type": "string",
                "description": "Subset of clusters, separated by commas (e.g., c1-de,c2-de,c3-de)"
            }
        },
        "required": ["clusters"]
    })
}

/// Normalized `c1,c2` path segment from the clusters argument
fn clusters_segment(args: Value) -> Result<String, McpError> {
    #[derive(Deserialize)]
    struct ClustersArgs {
        clusters: String,
    }

    let args: ClustersArgs = parse_args(args)?;
    Ok(require_csv("clusters", &args.clusters)?.join(","))
}

pub struct GetClustersStatusHandler {
    services: Arc<Services>,
}

impl GetClustersStatusHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetClustersStatusHandler {
    fn name(&self) -> &str {
        "monitoring_get_clusters_status"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "monitoring_get_clusters_status".to_string(),
            description: "Retrieves the status of all Algolia clusters and instances".to_string(),
            input_schema: no_args_schema(),
        }
    }

    async fn execute(&self, _args: Value) -> Result<ToolResult, McpError> {
        let res = self
            .services
            .client
            .send(ApiRequest::get(Api::Status, &["1", "status"]).public())
            .await?;
        json_result("Clusters Status", &res)
    }
}

pub struct GetIncidentsHandler {
    services: Arc<Services>,
}

impl GetIncidentsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetIncidentsHandler {
    fn name(&self) -> &str {
        "monitoring_get_incidents"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "monitoring_get_incidents".to_string(),
            description: "Retrieves known incidents for all clusters".to_string(),
            input_schema: no_args_schema(),
        }
    }

    async fn execute(&self, _args: Value) -> Result<ToolResult, McpError> {
        let res = self
            .services
            .client
            .send(ApiRequest::get(Api::Status, &["1", "incidents"]).public())
            .await?;
        json_result("Incidents", &res)
    }
}

pub struct GetIndexingTimeHandler {
    services: Arc<Services>,
}

impl GetIndexingTimeHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetIndexingTimeHandler {
    fn name(&self) -> &str {
        "monitoring_get_indexing_time"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "monitoring_get_indexing_time".to_string(),
            description: "Retrieves average times for indexing operations for selected clusters"
                .to_string(),
            input_schema: clusters_schema(),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let clusters = clusters_segment(args)?;

        let res = self
            .services
            .client
            .send(ApiRequest::get(Api::Status, &["1", "indexing", &clusters]).public())
            .await?;
        json_result("Indexing Time", &res)
    }
}

pub struct GetReachabilityHandler {
    services: Arc<Services>,
}

impl GetReachabilityHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetReachabilityHandler {
    fn name(&self) -> &str {
        "monitoring_get_reachability"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "monitoring_get_reachability".to_string(),
            description: "Test whether clusters are reachable or not".to_string(),
            input_schema: clusters_schema(),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let clusters = clusters_segment(args)?;

        let res = self
            .services
            .client
            .send(
                ApiRequest::get(Api::Status, &["1", "reachability", &clusters, "probes"]).public(),
            )
            .await?;
        json_result("Reachability", &res)
    }
}

pub struct GetMetricsHandler {
    services: Arc<Services>,
}

impl GetMetricsHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for GetMetricsHandler {
    fn name(&self) -> &str {
        "monitoring_get_metrics"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "monitoring_get_metrics".to_string(),
            description: "Retrieves metrics related to your Algolia infrastructure, aggregated over a selected time window"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "metric": {
                        "type": "string",
                        "enum": METRICS,
                        "description": "Metric to report (avg_build_time, ssd_usage, ram_search_usage, ram_indexing_usage, cpu_usage, or * for all)"
                    },
                    "period": {
                        "type": "string",
                        "enum": PERIODS,
                        "description": "Period over which to aggregate the metrics (minute, hour, day, week, month)"
                    }
                },
                "required": ["metric", "period"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        #[derive(Deserialize)]
        struct MetricsArgs {
            metric: String,
            period: String,
        }

        let args: MetricsArgs = parse_args(args)?;
        require_one_of("metric", &args.metric, METRICS)?;
        require_one_of("period", &args.period, PERIODS)?;

        let res = self
            .services
            .client
            .send(ApiRequest::get(
                Api::Status,
                &["1", "infrastructure", &args.metric, "period", &args.period],
            ))
            .await?;
        json_result("Infrastructure Metrics", &res)
    }
}
