//! What each tool sends to the Algolia API: method, path, query and body

#[cfg(test)]
mod tests {
    use crate::common::{call_tool, mock_handlers, resource_json, READ_KEY, WRITE_KEY};
    use algolia_mcp::mcp::protocol::INVALID_PARAMS;
    use httpmock::prelude::*;
    use serde_json::{json, Value};

    /// Matches requests that carry no Algolia credentials
    fn without_credentials(req: &HttpMockRequest) -> bool {
        req.headers.as_ref().map_or(true, |headers| {
            headers.iter().all(|(name, _)| {
                !name.eq_ignore_ascii_case("x-algolia-api-key")
                    && !name.eq_ignore_ascii_case("x-algolia-application-id")
            })
        })
    }

    fn without_clear_flag(req: &HttpMockRequest) -> bool {
        req.query_params
            .as_ref()
            .map_or(true, |params| params.iter().all(|(name, _)| name != "clearExistingRules"))
    }

    fn variants() -> Value {
        json!([
            {"index": "products", "trafficPercentage": 50},
            {"index": "products_b", "trafficPercentage": 50}
        ])
    }

    // Search API

    #[tokio::test]
    async fn test_insert_objects_sends_batch() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/1/indexes/products/batch")
                    .header("x-algolia-api-key", WRITE_KEY)
                    .json_body(json!({
                        "requests": [
                            {"action": "updateObject", "body": {"objectID": "1", "name": "Boot"}},
                            {"action": "updateObject", "body": {"objectID": "2", "name": "Sock"}}
                        ]
                    }));
                then.status(200).json_body(json!({"taskID": 5, "objectIDs": ["1", "2"]}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "insert_objects",
            json!({"objects": [
                {"objectID": "1", "name": "Boot"},
                {"objectID": "2", "name": "Sock"}
            ]}),
        )
        .await;

        mock.assert_async().await;
        let (title, body) = resource_json(&response);
        assert_eq!(title, "batch insert result");
        assert_eq!(body["taskID"], 5);
    }

    #[tokio::test]
    async fn test_insert_objects_requires_object_ids() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200).json_body(json!({}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "insert_objects",
            json!({"objects": "[{\"objectID\": \"1\"}, {\"name\": \"no id\"}]"}),
        )
        .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert!(error.message.contains("object at index 1"));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_delete_object() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/1/indexes/products/sku-1")
                    .header("x-algolia-api-key", WRITE_KEY);
                then.status(200).json_body(json!({"taskID": 9}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(&handlers, "delete_object", json!({"objectID": "sku-1"})).await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "task");
    }

    #[tokio::test]
    async fn test_set_settings_forwards_object() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/1/indexes/products/settings")
                    .header("x-algolia-api-key", WRITE_KEY)
                    .json_body(json!({"searchableAttributes": ["name", "brand"]}));
                then.status(200).json_body(json!({"taskID": 3}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "set_settings",
            json!({"object": "{\"searchableAttributes\": [\"name\", \"brand\"]}"}),
        )
        .await;

        mock.assert_async().await;
        let (_, body) = resource_json(&response);
        assert_eq!(body["taskID"], 3);
    }

    #[tokio::test]
    async fn test_search_rules_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/1/indexes/products/rules/search")
                    .header("x-algolia-api-key", READ_KEY)
                    .json_body(json!({
                        "query": "sale",
                        "anchoring": "contains",
                        "context": "mobile",
                        "enabled": true
                    }));
                then.status(200).json_body(json!({"hits": [], "nbHits": 0}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "search_rules",
            json!({"query": "sale", "anchoring": "contains", "context": "mobile", "enabled": true}),
        )
        .await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "rules");
    }

    #[tokio::test]
    async fn test_search_rules_omits_empty_filters() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/1/indexes/products/rules/search")
                    .json_body(json!({"query": ""}));
                then.status(200).json_body(json!({"hits": []}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "search_rules",
            json!({"query": "", "anchoring": "", "context": ""}),
        )
        .await;

        mock.assert_async().await;
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_search_rules_bad_anchoring() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "search_rules",
            json!({"query": "sale", "anchoring": "near"}),
        )
        .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert!(error.message.contains("anchoring must be one of"));
    }

    #[tokio::test]
    async fn test_delete_rule() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/1/indexes/products/rules/rule-1")
                    .header("x-algolia-api-key", WRITE_KEY);
                then.status(200).json_body(json!({"taskID": 11}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(&handlers, "delete_rule", json!({"objectID": "rule-1"})).await;

        mock.assert_async().await;
        let (_, body) = resource_json(&response);
        assert_eq!(body["taskID"], 11);
    }

    #[tokio::test]
    async fn test_save_synonym_forwards_verbatim() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/1/indexes/products/synonyms/syn-1")
                    .header("x-algolia-api-key", WRITE_KEY)
                    .json_body(json!({
                        "objectID": "syn-1",
                        "type": "synonym",
                        "synonyms": ["tv", "television"]
                    }));
                then.status(200).json_body(json!({"taskID": 4, "id": "syn-1"}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "save_synonym",
            json!({
                "objectID": "syn-1",
                "synonym": "{\"objectID\": \"syn-1\", \"type\": \"synonym\", \"synonyms\": [\"tv\", \"television\"]}"
            }),
        )
        .await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "task");
    }

    #[tokio::test]
    async fn test_clear_synonyms() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/1/indexes/articles/synonyms/clear")
                    .header("x-algolia-api-key", WRITE_KEY);
                then.status(200).json_body(json!({"taskID": 8}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(&handlers, "clear_synonyms", json!({"indexName": "articles"})).await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "clear result");
    }

    #[tokio::test]
    async fn test_run_query_accepts_float_counts() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/1/indexes/products/query")
                    .json_body(json!({"query": "shoe", "hitsPerPage": 5, "page": 1}));
                then.status(200).json_body(json!({"hits": []}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "run_query",
            json!({"query": "shoe", "hitsPerPage": 5.0, "page": 1.0}),
        )
        .await;

        mock.assert_async().await;
        assert!(response.error.is_none());
    }

    // A/B testing

    #[tokio::test]
    async fn test_get_abtest_accepts_float_id() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/2/abtests/42");
                then.status(200).json_body(json!({"abTestID": 42}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(&handlers, "abtesting_get_abtest", json!({"id": 42.0})).await;

        mock.assert_async().await;
        let (title, body) = resource_json(&response);
        assert_eq!(title, "AB Test 42");
        assert_eq!(body["abTestID"], 42);
    }

    #[tokio::test]
    async fn test_get_abtest_rejects_fractional_id() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(&handlers, "abtesting_get_abtest", json!({"id": 42.5})).await;

        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_create_abtest_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/2/abtests")
                    .header("x-algolia-api-key", WRITE_KEY)
                    .json_body(json!({
                        "name": "ranking",
                        "endAt": "2030-01-01T00:00:00Z",
                        "variants": variants()
                    }));
                then.status(200).json_body(json!({"abTestID": 1, "taskID": 2}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "abtesting_create_abtest",
            json!({
                "name": "ranking",
                "endAt": "2030-01-01T00:00:00Z",
                "variants": variants().to_string()
            }),
        )
        .await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "AB Test Created");
    }

    #[tokio::test]
    async fn test_create_abtest_needs_two_variants() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "abtesting_create_abtest",
            json!({
                "name": "ranking",
                "endAt": "2030-01-01T00:00:00Z",
                "variants": [{"index": "products", "trafficPercentage": 100}]
            }),
        )
        .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert!(error.message.contains("exactly 2 variants"));
    }

    #[tokio::test]
    async fn test_schedule_abtest_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/2/abtests/schedule")
                    .header("x-algolia-api-key", WRITE_KEY)
                    .json_body(json!({
                        "name": "ranking",
                        "scheduledAt": "2030-01-01T00:00:00Z",
                        "endAt": "2030-02-01T00:00:00Z",
                        "variants": variants()
                    }));
                then.status(200).json_body(json!({"abTestScheduleID": 3}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "abtesting_schedule_abtest",
            json!({
                "name": "ranking",
                "scheduledAt": "2030-01-01T00:00:00Z",
                "endAt": "2030-02-01T00:00:00Z",
                "variants": variants()
            }),
        )
        .await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "AB Test Scheduled");
    }

    #[tokio::test]
    async fn test_estimate_abtest_uses_read_key() {
        let server = MockServer::start_async().await;
        let configuration = json!({"minimumDetectableEffect": {"size": 0.03, "metric": "conversionRate"}});
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/2/abtests/estimate")
                    .header("x-algolia-api-key", READ_KEY)
                    .json_body(json!({
                        "configuration": {"minimumDetectableEffect": {"size": 0.03, "metric": "conversionRate"}},
                        "variants": variants()
                    }));
                then.status(200).json_body(json!({"durationDays": 21}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "abtesting_estimate_abtest",
            json!({"configuration": configuration, "variants": variants()}),
        )
        .await;

        mock.assert_async().await;
        let (title, body) = resource_json(&response);
        assert_eq!(title, "AB Test Estimate");
        assert_eq!(body["durationDays"], 21);
    }

    #[tokio::test]
    async fn test_estimate_abtest_needs_effect() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "abtesting_estimate_abtest",
            json!({"configuration": {}, "variants": variants()}),
        )
        .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert!(error.message.contains("minimumDetectableEffect"));
    }

    #[tokio::test]
    async fn test_stop_abtest() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/2/abtests/42/stop")
                    .header("x-algolia-api-key", WRITE_KEY);
                then.status(200).json_body(json!({"abTestID": 42, "taskID": 6}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(&handlers, "abtesting_stop_abtest", json!({"id": 42})).await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "AB Test 42 Stopped");
    }

    #[tokio::test]
    async fn test_delete_abtest() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(DELETE)
                    .path("/2/abtests/7")
                    .header("x-algolia-api-key", WRITE_KEY);
                then.status(200).json_body(json!({"abTestID": 7}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(&handlers, "abtesting_delete_abtest", json!({"id": 7.0})).await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "AB Test 7 Deleted");
    }

    // Collections

    #[tokio::test]
    async fn test_upsert_collection_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/1/collections")
                    .header("x-algolia-api-key", WRITE_KEY)
                    .json_body(json!({
                        "indexName": "products",
                        "name": "Summer",
                        "description": "Summer picks",
                        "add": ["sku-1", "sku-2"],
                        "conditions": {"filters": "season:summer"}
                    }));
                then.status(200).json_body(json!({"id": "col-1"}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "collections_upsert_collection",
            json!({
                "indexName": "products",
                "name": "Summer",
                "description": "Summer picks",
                "add": "[\"sku-1\", \"sku-2\"]",
                "remove": "",
                "conditions": {"filters": "season:summer"}
            }),
        )
        .await;

        mock.assert_async().await;
        let (title, body) = resource_json(&response);
        assert_eq!(title, "Collection Upserted");
        assert_eq!(body["id"], "col-1");
    }

    #[tokio::test]
    async fn test_commit_collection() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/1/collections/col-1/commit")
                    .header("x-algolia-api-key", WRITE_KEY);
                then.status(202).json_body(json!({"taskID": 12}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "collections_commit_collection",
            json!({"id": "col-1"}),
        )
        .await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "Collection Commit Started");
    }

    // Query Suggestions

    #[tokio::test]
    async fn test_create_query_suggestions_config() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/1/configs")
                    .header("x-algolia-api-key", WRITE_KEY)
                    .json_body(json!({
                        "indexName": "products_qs",
                        "sourceIndices": [{"indexName": "products"}],
                        "exclude": ["free"],
                        "enablePersonalization": false
                    }));
                then.status(200).json_body(json!({"status": 200, "message": "Configuration created"}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "query_suggestions_create_config",
            json!({
                "region": "us",
                "indexName": "products_qs",
                "sourceIndices": "[{\"indexName\": \"products\"}]",
                "exclude": ["free"],
                "languages": "",
                "enablePersonalization": false
            }),
        )
        .await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "Query Suggestions Configuration Created");
    }

    #[tokio::test]
    async fn test_update_query_suggestions_config() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/1/configs/products_qs")
                    .header("x-algolia-api-key", WRITE_KEY)
                    .json_body(json!({
                        "indexName": "products_qs",
                        "sourceIndices": [{"indexName": "products"}],
                        "languages": ["en", "fr"]
                    }));
                then.status(200).json_body(json!({"status": 200}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "query_suggestions_update_config",
            json!({
                "region": "eu",
                "indexName": "products_qs",
                "sourceIndices": [{"indexName": "products"}],
                "languages": ["en", "fr"]
            }),
        )
        .await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "Query Suggestions Configuration Updated");
    }

    #[tokio::test]
    async fn test_query_suggestions_config_needs_sources() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "query_suggestions_create_config",
            json!({"region": "us", "indexName": "products_qs", "sourceIndices": ""}),
        )
        .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert!(error.message.contains("sourceIndices"));
    }

    // Recommend

    #[tokio::test]
    async fn test_batch_recommend_rules_with_clear() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/1/indexes/products/related-products/recommend/rules/batch")
                    .query_param("clearExistingRules", "true")
                    .header("x-algolia-api-key", WRITE_KEY)
                    .json_body(json!([{"objectID": "r1", "condition": {"context": "home"}}]));
                then.status(200).json_body(json!({"taskID": 30}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "recommend_batch_recommend_rules",
            json!({
                "indexName": "products",
                "model": "related-products",
                "rules": "[{\"objectID\": \"r1\", \"condition\": {\"context\": \"home\"}}]",
                "clearExistingRules": true
            }),
        )
        .await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "Recommend Rules Batch");
    }

    #[tokio::test]
    async fn test_batch_recommend_rules_without_clear() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/1/indexes/products/bought-together/recommend/rules/batch")
                    .matches(without_clear_flag)
                    .json_body(json!([]));
                then.status(200).json_body(json!({"taskID": 31}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "recommend_batch_recommend_rules",
            json!({"indexName": "products", "model": "bought-together", "rules": []}),
        )
        .await;

        mock.assert_async().await;
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_recommend_task_status() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/1/indexes/products/trending-items/task/123")
                    .header("x-algolia-api-key", READ_KEY);
                then.status(200).json_body(json!({"status": "published"}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "recommend_get_recommend_status",
            json!({"indexName": "products", "model": "trending-items", "taskID": 123.0}),
        )
        .await;

        mock.assert_async().await;
        let (title, body) = resource_json(&response);
        assert_eq!(title, "Recommend Task Status");
        assert_eq!(body["status"], "published");
    }

    // Usage

    #[tokio::test]
    async fn test_metrics_registry_repeats_application() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/2/metrics/registry")
                    .query_param("application", "APP1")
                    .query_param("application", "APP2");
                then.status(200).json_body(json!({"metrics": []}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "usage_get_metrics_registry",
            json!({"applications": "APP1, APP2"}),
        )
        .await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "Metrics Registry");
    }

    #[tokio::test]
    async fn test_hourly_metrics_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/2/metrics/hourly")
                    .query_param("application", "APP1")
                    .query_param("startTime", "2030-01-01T00:00:00Z")
                    .query_param("endTime", "2030-01-02T00:00:00Z")
                    .query_param("name", "search_operations")
                    .query_param("name", "records");
                then.status(200).json_body(json!({"metrics": []}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "usage_get_hourly_metrics",
            json!({
                "application": "APP1",
                "startTime": "2030-01-01T00:00:00Z",
                "endTime": "2030-01-02T00:00:00Z",
                "metricNames": "search_operations,records"
            }),
        )
        .await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "Hourly Metrics");
    }

    #[tokio::test]
    async fn test_hourly_metrics_bad_timestamp() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "usage_get_hourly_metrics",
            json!({"application": "APP1", "startTime": "yesterday", "metricNames": "records"}),
        )
        .await;

        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert!(error.message.contains("startTime"));
    }

    // Monitoring (public status API)

    #[tokio::test]
    async fn test_clusters_status_sends_no_credentials() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/1/status").matches(without_credentials);
                then.status(200).json_body(json!({"status": {"c1-de": "operational"}}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(&handlers, "monitoring_get_clusters_status", json!({})).await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "Clusters Status");
    }

    #[tokio::test]
    async fn test_incidents_sends_no_credentials() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/1/incidents").matches(without_credentials);
                then.status(200).json_body(json!({"incidents": {}}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(&handlers, "monitoring_get_incidents", json!({})).await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "Incidents");
    }

    #[tokio::test]
    async fn test_reachability_path_and_no_credentials() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/1/reachability/c1-de,c2-fr/probes")
                    .matches(without_credentials);
                then.status(200).json_body(json!({"c1-de": {}}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = call_tool(
            &handlers,
            "monitoring_get_reachability",
            json!({"clusters": "c1-de,c2-fr"}),
        )
        .await;

        mock.assert_async().await;
        let (title, _) = resource_json(&response);
        assert_eq!(title, "Reachability");
    }
}
