//! MCP resources backed by the default index
//!
//! `algolia://settings` returns the index settings and
//! `algolia://records/{objectID}` looks up a single record.

use crate::core::client::{Api, ApiRequest};
use crate::core::services::Services;
use crate::mcp::error::McpError;
use crate::mcp::protocol::{
    ResourceContents, ResourceSchema, ResourceTemplateSchema, JSON_MIME_TYPE,
};
use crate::mcp::tools::helpers::resolve_index;
use std::sync::Arc;
use tracing::debug;

pub const SETTINGS_URI: &str = "algolia://settings";
pub const RECORD_URI_TEMPLATE: &str = "algolia://records/{objectID}";
const RECORD_URI_PREFIX: &str = "algolia://records/";

/// A parsed resource URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri<'a> {
    Settings,
    Record(&'a str),
}

impl<'a> ResourceUri<'a> {
    pub fn parse(uri: &'a str) -> Option<Self> {
        if uri == SETTINGS_URI {
            return Some(ResourceUri::Settings);
        }
        uri.strip_prefix(RECORD_URI_PREFIX)
            .filter(|id| !id.is_empty() && !id.contains('/'))
            .map(ResourceUri::Record)
    }
}

pub struct ResourceProvider {
    services: Arc<Services>,
}

impl ResourceProvider {
    pub fn new(services: Arc<Services>) -> Self {
        Self { services }
    }

    /// Static resources for resources/list
    pub fn list(&self) -> Vec<ResourceSchema> {
        vec![ResourceSchema {
            uri: SETTINGS_URI.to_string(),
            name: "Index settings".to_string(),
            description: "Get the settings for the Algolia index".to_string(),
            mime_type: JSON_MIME_TYPE.to_string(),
        }]
    }

    /// URI templates for resources/templates/list
    pub fn templates(&self) -> Vec<ResourceTemplateSchema> {
        vec![ResourceTemplateSchema {
            uri_template: RECORD_URI_TEMPLATE.to_string(),
            name: "Lookup a record by object ID".to_string(),
            description: "Get a record from the Algolia index by its object ID".to_string(),
            mime_type: JSON_MIME_TYPE.to_string(),
        }]
    }

    /// Read a resource from the default index
    pub async fn read(&self, uri: &str) -> Result<Vec<ResourceContents>, McpError> {
        let parsed =
            ResourceUri::parse(uri).ok_or_else(|| McpError::ResourceNotFound(uri.to_string()))?;
        let index = resolve_index(&self.services, None)?;
        debug!("Reading resource {} from index {}", uri, index);

        let request = match parsed {
            ResourceUri::Settings => {
                ApiRequest::get(Api::Search, &["1", "indexes", &index, "settings"])
            }
            ResourceUri::Record(object_id) => {
                ApiRequest::get(Api::Search, &["1", "indexes", &index, object_id])
            }
        };
        let value = self.services.client.send(request).await?;

        Ok(vec![ResourceContents {
            uri: uri.to_string(),
            mime_type: JSON_MIME_TYPE.to_string(),
            text: serde_json::to_string(&value)?,
        }])
    }
}
