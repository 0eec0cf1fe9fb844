//! run_query tool handler
//!
//! Runs a search against an index with the common query options.

use super::index_name_property;
use crate::core::client::{Api, ApiRequest};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{ToolResult, ToolSchema};
use crate::mcp::tools::handler::{json_result, McpToolHandler};
use crate::mcp::tools::helpers::{
    non_empty, optional_whole_number, parse_args, resolve_index, split_csv,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryArgs {
    query: String,
    #[serde(default)]
    index_name: Option<String>,
    #[serde(default, deserialize_with = "optional_whole_number")]
    hits_per_page: Option<u32>,
    #[serde(default, deserialize_with = "optional_whole_number")]
    page: Option<u32>,
    #[serde(default)]
    filters: Option<String>,
    #[serde(default)]
    facets: Option<String>,
    #[serde(default)]
    restrict_searchable_attributes: Option<String>,
}

impl RunQueryArgs {
    /// Search parameters sent as the request body
    fn params(&self) -> Value {
        let mut params = Map::new();
        params.insert("query".to_string(), json!(self.query));

        if let Some(n) = self.hits_per_page {
            params.insert("hitsPerPage".to_string(), json!(n));
        }
        if let Some(p) = self.page {
            params.insert("page".to_string(), json!(p));
        }
        if let Some(filters) = non_empty(self.filters.clone()) {
            params.insert("filters".to_string(), json!(filters));
        }
        if let Some(facets) = non_empty(self.facets.clone()) {
            params.insert("facets".to_string(), json!(split_csv(&facets)));
        }
        if let Some(attrs) = non_empty(self.restrict_searchable_attributes.clone()) {
            params.insert(
                "restrictSearchableAttributes".to_string(),
                json!(split_csv(&attrs)),
            );
        }

        Value::Object(params)
    }
}

pub struct RunQueryHandler {
    services: Arc<Services>,
}

impl RunQueryHandler {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl McpToolHandler for RunQueryHandler {
    fn name(&self) -> &str {
        "run_query"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "run_query".to_string(),
            description: "Run a query against the Algolia search index with advanced options. \
                         Supports pagination, filters, facets and restricting the searched attributes."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The query to run against the index"
                    },
                    "indexName": index_name_property(),
                    "hitsPerPage": {
                        "type": "integer",
                        "description": "The number of hits to return per page",
                        "minimum": 0,
                        "maximum": 1000
                    },
                    "page": {
                        "type": "integer",
                        "description": "The page number (0-based) to retrieve",
                        "minimum": 0
                    },
                    "filters": {
                        "type": "string",
                        "description": "The filter expression using Algolia's filter syntax (e.g., 'category:Book AND price < 100')"
                    },
                    "facets": {
                        "type": "string",
                        "description": "Comma-separated list of attributes to facet on"
                    },
                    "restrictSearchableAttributes": {
                        "type": "string",
                        "description": "Comma-separated list of attributes to search in"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, McpError> {
        let args: RunQueryArgs = parse_args(args)?;

        if let Some(n) = args.hits_per_page {
            if n > 1000 {
                return Err(McpError::InvalidParams(
                    "hitsPerPage cannot exceed 1000".to_string(),
                ));
            }
        }

        let index = resolve_index(&self.services, args.index_name.clone())?;

        let start = Instant::now();
        let res = self
            .services
            .client
            .send(
                ApiRequest::post(Api::Search, &["1", "indexes", &index, "query"])
                    .json(args.params()),
            )
            .await?;
        info!(
            "Search for {:?} took {}ms",
            args.query,
            start.elapsed().as_millis()
        );

        json_result("query results", &res)
    }
}
