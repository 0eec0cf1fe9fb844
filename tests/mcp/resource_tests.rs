//! MCP resources tests

#[cfg(test)]
mod tests {
    use crate::common::{mock_handlers, rpc};
    use algolia_mcp::mcp::protocol::{INVALID_PARAMS, RESOURCE_NOT_FOUND};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_resources_list() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = handlers
            .dispatch(&rpc(1, "resources/list", json!({})))
            .await
            .unwrap();
        let result = response.result.unwrap();

        assert_eq!(result["resources"][0]["uri"], "algolia://settings");
        assert_eq!(result["resources"][0]["name"], "Index settings");
        assert_eq!(result["resources"][0]["mimeType"], "application/json");
    }

    #[tokio::test]
    async fn test_resource_templates_list() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = handlers
            .dispatch(&rpc(1, "resources/templates/list", json!({})))
            .await
            .unwrap();
        let result = response.result.unwrap();

        assert_eq!(
            result["resourceTemplates"][0]["uriTemplate"],
            "algolia://records/{objectID}"
        );
        assert_eq!(
            result["resourceTemplates"][0]["name"],
            "Lookup a record by object ID"
        );
    }

    #[tokio::test]
    async fn test_read_settings() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/1/indexes/products/settings");
                then.status(200)
                    .json_body(json!({"searchableAttributes": ["name"]}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = handlers
            .dispatch(&rpc(
                1,
                "resources/read",
                json!({"uri": "algolia://settings"}),
            ))
            .await
            .unwrap();

        mock.assert_async().await;
        let result = response.result.unwrap();
        let contents = &result["contents"][0];
        assert_eq!(contents["uri"], "algolia://settings");
        assert_eq!(contents["mimeType"], "application/json");
        let settings: serde_json::Value =
            serde_json::from_str(contents["text"].as_str().unwrap()).unwrap();
        assert_eq!(settings["searchableAttributes"], json!(["name"]));
    }

    #[tokio::test]
    async fn test_read_record() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/1/indexes/products/sku-9");
                then.status(200)
                    .json_body(json!({"objectID": "sku-9", "name": "Sandal"}));
            })
            .await;

        let handlers = mock_handlers(&server, |_| {});
        let response = handlers
            .dispatch(&rpc(
                1,
                "resources/read",
                json!({"uri": "algolia://records/sku-9"}),
            ))
            .await
            .unwrap();

        mock.assert_async().await;
        let result = response.result.unwrap();
        assert_eq!(result["contents"][0]["uri"], "algolia://records/sku-9");
        assert!(result["contents"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Sandal"));
    }

    #[tokio::test]
    async fn test_read_unknown_uri() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = handlers
            .dispatch(&rpc(
                1,
                "resources/read",
                json!({"uri": "algolia://indices"}),
            ))
            .await
            .unwrap();

        let error = response.error.unwrap();
        assert_eq!(error.code, RESOURCE_NOT_FOUND);
        assert!(error.message.contains("algolia://indices"));
    }

    #[tokio::test]
    async fn test_read_missing_uri_param() {
        let server = MockServer::start_async().await;
        let handlers = mock_handlers(&server, |_| {});
        let response = handlers
            .dispatch(&rpc(1, "resources/read", json!({})))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }
}
