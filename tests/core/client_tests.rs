//! Algolia client tests against a mock server

#[cfg(test)]
mod tests {
    use crate::common::{mock_config, APP_ID, READ_KEY, WRITE_KEY};
    use algolia_mcp::core::client::{AlgoliaClient, Api, ApiRequest, Region};
    use algolia_mcp::core::error::AlgoliaError;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_with_headers_and_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/2/metrics/registry")
                    .query_param("application", "A1")
                    .query_param("application", "A2")
                    .header("x-algolia-application-id", APP_ID)
                    .header("x-algolia-api-key", READ_KEY)
                    .header("content-type", "application/json");
                then.status(200).json_body(json!({"metrics": []}));
            })
            .await;

        let client = AlgoliaClient::new(&mock_config(&server)).unwrap();
        let value = client
            .send(
                ApiRequest::get(Api::Usage, &["2", "metrics", "registry"])
                    .query("application", "A1")
                    .query("application", "A2"),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(value, json!({"metrics": []}));
    }

    #[tokio::test]
    async fn test_post_sends_json_body_with_write_key() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/1/indexes/products/clear")
                    .header("x-algolia-api-key", WRITE_KEY)
                    .json_body(json!({"reason": "test"}));
                then.status(200).json_body(json!({"taskID": 1}));
            })
            .await;

        let client = AlgoliaClient::new(&mock_config(&server)).unwrap();
        let value = client
            .send(
                ApiRequest::post(Api::Search, &["1", "indexes", "products", "clear"])
                    .json(json!({"reason": "test"}))
                    .write("clear index"),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(value["taskID"], 1);
    }

    #[tokio::test]
    async fn test_any_2xx_is_success() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/1/collections");
                then.status(201).json_body(json!({"id": "c1"}));
            })
            .await;

        let client = AlgoliaClient::new(&mock_config(&server)).unwrap();
        let value = client
            .send(ApiRequest::post(Api::Experiences, &["1", "collections"]).json(json!({})))
            .await
            .unwrap();
        assert_eq!(value["id"], "c1");
    }

    #[tokio::test]
    async fn test_error_with_plain_text_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/1/status");
                then.status(503).body("upstream unavailable");
            })
            .await;

        let client = AlgoliaClient::new(&mock_config(&server)).unwrap();
        let err = client
            .send(ApiRequest::get(Api::Status, &["1", "status"]).public())
            .await
            .unwrap_err();

        match err {
            AlgoliaError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_with_empty_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/1/incidents");
                then.status(500);
            })
            .await;

        let client = AlgoliaClient::new(&mock_config(&server)).unwrap();
        let err = client
            .send(ApiRequest::get(Api::Status, &["1", "incidents"]).public())
            .await
            .unwrap_err();

        assert!(err.is_upstream());
        assert_eq!(err.to_string(), "Algolia API error (status 500): status 500");
    }

    #[tokio::test]
    async fn test_missing_write_key_fails_before_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;

        let mut config = mock_config(&server);
        config.algolia.write_api_key = None;
        let client = AlgoliaClient::new(&config).unwrap();
        assert!(!client.has_write_key());

        let err = client
            .send(ApiRequest::delete(Api::Search, &["1", "indexes", "products"]).write("delete index"))
            .await
            .unwrap_err();

        assert!(matches!(err, AlgoliaError::MissingCredentials(_)));
        assert_eq!(
            err.to_string(),
            "Missing credentials: write API key not set, cannot delete index"
        );
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_host_placeholders_are_substituted() {
        let server = MockServer::start_async().await;
        let search = server
            .mock_async(|when, then| {
                when.method(GET).path("/testapp/1/indexes");
                then.status(200).json_body(json!({"items": []}));
            })
            .await;
        let suggestions = server
            .mock_async(|when, then| {
                when.method(GET).path("/eu/1/configs");
                then.status(200).json_body(json!([]));
            })
            .await;

        let mut config = mock_config(&server);
        config.hosts.search = format!("{}/{{app_id}}", server.base_url());
        config.hosts.query_suggestions = format!("{}/{{region}}", server.base_url());
        let client = AlgoliaClient::new(&config).unwrap();

        client
            .send(ApiRequest::get(Api::Search, &["1", "indexes"]))
            .await
            .unwrap();
        client
            .send(ApiRequest::get(Api::QuerySuggestions(Region::Eu), &["1", "configs"]))
            .await
            .unwrap();

        search.assert_async().await;
        suggestions.assert_async().await;
    }
}
