//! HTTP+SSE transport
//!
//! A client opens `GET /sse` and receives an `endpoint` event naming
//! its message URL. Requests are POSTed to `/message?sessionId=...`,
//! acknowledged with 202, and answered as `message` events on the
//! session's stream.

use crate::mcp::error::McpError;
use crate::mcp::handlers::ProtocolHandlers;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use futures::{stream, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, RwLock};
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);
const SESSION_BUFFER: usize = 32;

type Sessions = Arc<RwLock<HashMap<String, mpsc::Sender<String>>>>;

/// Shared state for the SSE routes
#[derive(Clone)]
pub struct SseState {
    handlers: Arc<ProtocolHandlers>,
    sessions: Sessions,
}

impl SseState {
    pub fn new(handlers: Arc<ProtocolHandlers>) -> Self {
        Self {
            handlers,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of open SSE sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Removes the session from the map once its event stream is dropped
struct SessionGuard {
    id: String,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let id = std::mem::take(&mut self.id);
        let sessions = Arc::clone(&self.sessions);
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                sessions.write().await.remove(&id);
                info!("SSE session {} closed", id);
            });
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

/// Build the SSE router
pub fn router(state: SseState) -> Router {
    Router::new()
        .route("/sse", get(sse_handler))
        .route("/message", post(message_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the SSE transport on `addr` until Ctrl+C
pub async fn serve(handlers: Arc<ProtocolHandlers>, addr: &str) -> Result<(), McpError> {
    let app = router(SseState::new(handlers));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Listening on {}", addr);
    info!("SSE endpoint at http://{}/sse", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Received shutdown signal");
        })
        .await?;

    info!("MCP server shutting down");
    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn sse_handler(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session_id = Uuid::new_v4().to_string();
    let (tx, rx) = mpsc::channel::<String>(SESSION_BUFFER);
    state.sessions.write().await.insert(session_id.clone(), tx);
    info!("SSE session {} opened", session_id);

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/message?sessionId={session_id}"));

    let guard = SessionGuard {
        id: session_id,
        sessions: Arc::clone(&state.sessions),
    };
    let messages = ReceiverStream::new(rx).map(move |json| {
        let _session = &guard;
        Ok::<_, Infallible>(Event::default().event("message").data(json))
    });

    let events = stream::once(async move { Ok::<_, Infallible>(endpoint) }).chain(messages);
    Sse::new(events).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

async fn message_handler(
    State(state): State<SseState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> StatusCode {
    let Some(session_id) = query.session_id.filter(|id| !id.is_empty()) else {
        return StatusCode::BAD_REQUEST;
    };

    let sender = state.sessions.read().await.get(&session_id).cloned();
    let Some(sender) = sender else {
        warn!("Message for unknown SSE session {}", session_id);
        return StatusCode::NOT_FOUND;
    };

    let handlers = Arc::clone(&state.handlers);
    tokio::spawn(async move {
        let Some(response) = handlers.dispatch(&body).await else {
            return;
        };
        match serde_json::to_string(&response) {
            Ok(json) => {
                debug!("Sending on {}: {}", session_id, json);
                if sender.send(json).await.is_err() {
                    debug!("SSE session {} went away before the response", session_id);
                }
            }
            Err(e) => error!("Could not encode response: {}", e),
        }
    });

    StatusCode::ACCEPTED
}

/// Request logging middleware
async fn log_request(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration_ms,
            "Request failed"
        );
    } else {
        debug!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            duration_ms = %duration_ms,
            "Request completed"
        );
    }

    response
}
