//! HTTP+SSE transport tests

#[cfg(test)]
mod tests {
    use crate::common::mock_handlers;
    use algolia_mcp::mcp::sse::{router, SseState};
    use httpmock::MockServer;
    use serde_json::Value;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    async fn start(server: &MockServer) -> (SocketAddr, SseState) {
        let state = SseState::new(Arc::new(mock_handlers(server, |_| {})));
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (addr, state)
    }

    /// Read SSE chunks until an event named `event` arrives; returns its data
    async fn next_event(response: &mut reqwest::Response, buffer: &mut String, event: &str) -> String {
        loop {
            if let Some(end) = buffer.find("\n\n") {
                let frame: String = buffer.drain(..end + 2).collect();
                let mut name = None;
                let mut data = Vec::new();
                for line in frame.lines() {
                    if let Some(v) = line.strip_prefix("event:") {
                        name = Some(v.trim().to_string());
                    } else if let Some(v) = line.strip_prefix("data:") {
                        data.push(v.trim_start().to_string());
                    }
                }
                if name.as_deref() == Some(event) {
                    return data.join("\n");
                }
                continue;
            }

            let chunk = tokio::time::timeout(Duration::from_secs(5), response.chunk())
                .await
                .expect("timed out waiting for SSE event")
                .unwrap()
                .expect("stream ended");
            buffer.push_str(&String::from_utf8_lossy(&chunk));
        }
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start_async().await;
        let (addr, _) = start(&server).await;

        let body: Value = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_round_trip_over_sse() {
        let server = MockServer::start_async().await;
        let (addr, state) = start(&server).await;
        let client = reqwest::Client::new();

        let mut stream = client
            .get(format!("http://{addr}/sse"))
            .send()
            .await
            .unwrap();
        assert_eq!(stream.status(), 200);

        let mut buffer = String::new();
        let endpoint = next_event(&mut stream, &mut buffer, "endpoint").await;
        assert!(endpoint.starts_with("/message?sessionId="));
        assert_eq!(state.session_count().await, 1);

        let status = client
            .post(format!("http://{addr}{endpoint}"))
            .body(r#"{"jsonrpc":"2.0","id":5,"method":"ping"}"#)
            .send()
            .await
            .unwrap()
            .status();
        assert_eq!(status, 202);

        let message = next_event(&mut stream, &mut buffer, "message").await;
        let response: Value = serde_json::from_str(&message).unwrap();
        assert_eq!(response["id"], 5);
        assert_eq!(response["result"], serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_notification_produces_no_event() {
        let server = MockServer::start_async().await;
        let (addr, _) = start(&server).await;
        let client = reqwest::Client::new();

        let mut stream = client
            .get(format!("http://{addr}/sse"))
            .send()
            .await
            .unwrap();
        let mut buffer = String::new();
        let endpoint = next_event(&mut stream, &mut buffer, "endpoint").await;

        let status = client
            .post(format!("http://{addr}{endpoint}"))
            .body(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .send()
            .await
            .unwrap()
            .status();
        assert_eq!(status, 202);

        // The next message event answers the ping, not the notification
        client
            .post(format!("http://{addr}{endpoint}"))
            .body(r#"{"jsonrpc":"2.0","id":6,"method":"ping"}"#)
            .send()
            .await
            .unwrap();
        let message = next_event(&mut stream, &mut buffer, "message").await;
        let response: Value = serde_json::from_str(&message).unwrap();
        assert_eq!(response["id"], 6);
    }

    #[tokio::test]
    async fn test_session_removed_when_stream_dropped() {
        let server = MockServer::start_async().await;
        let (addr, state) = start(&server).await;
        let client = reqwest::Client::new();

        let mut stream = client
            .get(format!("http://{addr}/sse"))
            .send()
            .await
            .unwrap();
        let mut buffer = String::new();
        let endpoint = next_event(&mut stream, &mut buffer, "endpoint").await;
        assert_eq!(state.session_count().await, 1);

        drop(stream);

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while state.session_count().await > 0 {
            assert!(
                tokio::time::Instant::now() < deadline,
                "session still registered after the stream closed"
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        let status = client
            .post(format!("http://{addr}{endpoint}"))
            .body(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#)
            .send()
            .await
            .unwrap()
            .status();
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let server = MockServer::start_async().await;
        let (addr, _) = start(&server).await;

        let status = reqwest::Client::new()
            .post(format!("http://{addr}/message?sessionId=nope"))
            .body("{}")
            .send()
            .await
            .unwrap()
            .status();
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_missing_session_id() {
        let server = MockServer::start_async().await;
        let (addr, _) = start(&server).await;

        let status = reqwest::Client::new()
            .post(format!("http://{addr}/message"))
            .body("{}")
            .send()
            .await
            .unwrap()
            .status();
        assert_eq!(status, 400);
    }
}
