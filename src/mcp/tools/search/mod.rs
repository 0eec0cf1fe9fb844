//! Search API toolset: indices, records, queries, rules and synonyms

pub mod indices;
pub mod query;
pub mod records;
pub mod rules;
pub mod synonyms;

use super::handler::McpToolHandler;
use crate::core::services::Services;
use serde_json::{json, Value};
use std::sync::Arc;

pub use indices::{
    ClearIndexHandler, CopyIndexHandler, DeleteIndexHandler, GetSettingsHandler,
    ListIndicesHandler, MoveIndexHandler, SetSettingsHandler,
};
pub use query::RunQueryHandler;
pub use records::{
    DeleteObjectHandler, GetObjectHandler, InsertObjectHandler, InsertObjectsHandler,
};
pub use rules::{DeleteRuleHandler, SearchRulesHandler};
pub use synonyms::{
    ClearSynonymsHandler, DeleteSynonymHandler, GetSynonymHandler, SaveSynonymHandler,
    SearchSynonymsHandler,
};

/// All search tools, read tools first
pub fn handlers(services: &Arc<Services>) -> Vec<Arc<dyn McpToolHandler>> {
    let s = || Arc::clone(services);
    vec![
        Arc::new(ListIndicesHandler::new(s())),
        Arc::new(GetSettingsHandler::new(s())),
        Arc::new(RunQueryHandler::new(s())),
        Arc::new(GetObjectHandler::new(s())),
        Arc::new(SearchRulesHandler::new(s())),
        Arc::new(GetSynonymHandler::new(s())),
        Arc::new(SearchSynonymsHandler::new(s())),
        Arc::new(InsertObjectHandler::new(s())),
        Arc::new(InsertObjectsHandler::new(s())),
        Arc::new(DeleteObjectHandler::new(s())),
        Arc::new(SetSettingsHandler::new(s())),
        Arc::new(ClearIndexHandler::new(s())),
        Arc::new(DeleteIndexHandler::new(s())),
        Arc::new(CopyIndexHandler::new(s())),
        Arc::new(MoveIndexHandler::new(s())),
        Arc::new(DeleteRuleHandler::new(s())),
        Arc::new(SaveSynonymHandler::new(s())),
        Arc::new(DeleteSynonymHandler::new(s())),
        Arc::new(ClearSynonymsHandler::new(s())),
    ]
}

/// Schema property shared by every tool that targets an index
pub(crate) fn index_name_property() -> Value {
    json!({
        "type": "string",
        "description": "The index to use (defaults to the configured index)"
    })
}

/// Schema for tools whose only argument is the index
pub(crate) fn index_only_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "indexName": index_name_property()
        },
        "required": []
    })
}
