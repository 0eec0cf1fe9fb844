//! MCP handler tests

#[cfg(test)]
mod tests {
    use crate::common::{mock_handlers, rpc};
    use algolia_mcp::mcp::protocol::*;
    use httpmock::MockServer;
    use serde_json::{json, Value};

    async fn result_of(server: &MockServer, method: &str, params: Value) -> Value {
        let handlers = mock_handlers(server, |_| {});
        let response = handlers.dispatch(&rpc(1, method, params)).await.unwrap();
        assert!(response.error.is_none(), "{:?}", response.error);
        response.result.unwrap()
    }

    fn tool_names(result: &Value) -> Vec<String> {
        result["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_initialize_handler() {
        let server = MockServer::start_async().await;
        let result = result_of(
            &server,
            "initialize",
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test", "version": "1.0"}
            }),
        )
        .await;

        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "algolia-mcp");
        assert_eq!(result["serverInfo"]["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
        assert_eq!(result["capabilities"]["resources"]["subscribe"], false);
    }

    #[tokio::test]
    async fn test_initialize_without_params() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = handlers
            .dispatch(r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#)
            .await
            .unwrap();
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_legacy_initialized_notification() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = handlers
            .dispatch(r#"{"jsonrpc":"2.0","method":"initialized"}"#)
            .await;
        assert!(response.is_none());
        assert!(handlers.is_initialized());
    }

    #[tokio::test]
    async fn test_unknown_notification_is_ignored() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = handlers
            .dispatch(r#"{"jsonrpc":"2.0","method":"notifications/cancelled","params":{}}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_tools_list_full_catalog() {
        let server = MockServer::start_async().await;
        let result = result_of(&server, "tools/list", json!({})).await;
        let names = tool_names(&result);

        assert_eq!(names.first().map(String::as_str), Some("list_indices"));
        assert_eq!(names.last().map(String::as_str), Some("get_server_info"));
        assert!(names.contains(&"move_index".to_string()));
        assert!(names.contains(&"monitoring_get_incidents".to_string()));
        assert!(names.contains(&"query_suggestions_get_log_file".to_string()));
        assert!(names.contains(&"usage_get_hourly_metrics".to_string()));

        for tool in result["tools"].as_array().unwrap() {
            assert_eq!(tool["inputSchema"]["type"], "object", "{}", tool["name"]);
            assert!(!tool["description"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_tools_list_is_stable() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let first = handlers.dispatch(&rpc(1, "tools/list", json!({}))).await.unwrap();
        let second = handlers.dispatch(&rpc(2, "tools/list", json!({}))).await.unwrap();
        assert_eq!(first.result, second.result);
    }

    #[tokio::test]
    async fn test_read_only_hides_write_tools() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |c| c.tools.read_only = true);
        let response = handlers.dispatch(&rpc(1, "tools/list", json!({}))).await.unwrap();
        let names = tool_names(&response.result.unwrap());

        assert!(names.contains(&"run_query".to_string()));
        assert!(names.contains(&"abtesting_estimate_abtest".to_string()));
        for write_tool in [
            "insert_object",
            "clear_index",
            "move_index",
            "delete_synonym",
            "abtesting_create_abtest",
            "collections_commit_collection",
            "query_suggestions_delete_config",
            "recommend_batch_recommend_rules",
        ] {
            assert!(!names.contains(&write_tool.to_string()), "{write_tool}");
        }
    }

    #[tokio::test]
    async fn test_read_only_write_tool_call_is_unknown() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |c| c.tools.read_only = true);
        let response = crate::common::call_tool(&handlers, "clear_index", json!({})).await;
        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert_eq!(error.message, "Unknown tool: clear_index");
    }

    #[tokio::test]
    async fn test_toolset_filter() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |c| {
            c.tools.toolsets = vec!["usage".to_string(), "server".to_string()];
        });
        let response = handlers.dispatch(&rpc(1, "tools/list", json!({}))).await.unwrap();
        assert_eq!(
            tool_names(&response.result.unwrap()),
            vec![
                "usage_get_metrics_registry",
                "usage_get_daily_metrics",
                "usage_get_hourly_metrics",
                "get_server_info"
            ]
        );
    }

    #[tokio::test]
    async fn test_tools_call_missing_params() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = handlers
            .dispatch(r#"{"jsonrpc":"2.0","id":9,"method":"tools/call"}"#)
            .await
            .unwrap();
        assert_eq!(response.id, Some(json!(9)));
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_get_server_info_lists_tools() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |c| {
            c.tools.toolsets = vec!["monitoring".to_string(), "server".to_string()];
        });
        let response = crate::common::call_tool(&handlers, "get_server_info", json!({})).await;
        let result = response.result.unwrap();
        let text = result["content"][0]["text"].as_str().unwrap();

        assert!(text.contains("- monitoring\n"));
        assert!(text.contains("- monitoring_get_metrics\n"));
        assert!(text.contains("- get_server_info\n"));
        assert!(!text.contains("run_query"));
    }

    #[tokio::test]
    async fn test_batch_requests_are_rejected() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = handlers
            .dispatch(r#"[{"jsonrpc":"2.0","id":1,"method":"ping"}]"#)
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }
}
