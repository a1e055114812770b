// Copyright 2025 Huddle (https://github.com/huddle-sports/huddle)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! HTTP streaming transport.
//!
//! A client's first `initialize` POST creates a session and returns its
//! opaque id in the `Mcp-Session-Id` header; every later request must carry
//! that header. `GET /mcp` opens the session's server-push SSE stream, where
//! progress notifications arrive ahead of final results. `DELETE /mcp` or an
//! SSE disconnect tears the session down. Origins are checked on every
//! request before any session work.

use crate::mcp::handler::McpHandler;
use crate::mcp::protocol::{
    JsonRpcError, JsonRpcId, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
    MCP_PROTOCOL_VERSION,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dashmap::DashMap;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const MCP_SESSION_HEADER: &str = "mcp-session-id";

/// Per-client continuation across HTTP requests.
pub struct McpSession {
    pub created_at: Instant,
    pub last_activity: Instant,
    push_tx: mpsc::Sender<JsonRpcNotification>,
    push_rx: Option<mpsc::Receiver<JsonRpcNotification>>,
}

pub struct HttpState {
    handler: Arc<McpHandler>,
    sessions: DashMap<String, McpSession>,
    allowed_origins: Vec<String>,
}

impl HttpState {
    pub fn new(handler: Arc<McpHandler>, allowed_origins: Vec<String>) -> Self {
        Self {
            handler,
            sessions: DashMap::new(),
            allowed_origins,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

pub fn router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route(
            "/mcp",
            post(handle_post).get(handle_sse).delete(handle_delete),
        )
        .route("/mcp/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(state: Arc<HttpState>, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "MCP HTTP transport listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn handle_health(State(state): State<Arc<HttpState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "protocol_version": MCP_PROTOCOL_VERSION,
        "server_name": "huddle-mcp",
        "server_version": env!("CARGO_PKG_VERSION"),
        "active_sessions": state.session_count(),
    }))
}

async fn handle_post(
    State(state): State<Arc<HttpState>>,
    headers: HeaderMap,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    if let Err(denied) = check_origin(&state, &headers) {
        return denied;
    }

    let session_header = header_value(&headers, MCP_SESSION_HEADER);

    // The first initialize opens a session; everything else rides on one.
    let session_id = match (request.method.as_str(), session_header) {
        ("initialize", None) => {
            let session_id = uuid::Uuid::new_v4().to_string();
            let (push_tx, push_rx) = mpsc::channel(64);
            state.sessions.insert(
                session_id.clone(),
                McpSession {
                    created_at: Instant::now(),
                    last_activity: Instant::now(),
                    push_tx,
                    push_rx: Some(push_rx),
                },
            );
            info!(%session_id, "MCP session created");
            session_id
        }
        (_, Some(session_id)) => {
            let Some(mut session) = state.sessions.get_mut(&session_id) else {
                return error_response(
                    StatusCode::NOT_FOUND,
                    &request,
                    JsonRpcError::invalid_request("Unknown session"),
                );
            };
            session.last_activity = Instant::now();

            // Announce tool calls on the push stream before dispatching, so
            // a listener sees progress ahead of the final result.
            if request.method == "tools/call" {
                let tool = request
                    .params
                    .as_ref()
                    .and_then(|p| p.get("name"))
                    .and_then(|n| n.as_str())
                    .unwrap_or("unknown");
                let note = JsonRpcNotification::new(
                    "notifications/message",
                    json!({"level": "info", "data": format!("calling tool {tool}")}),
                );
                let _ = session.push_tx.try_send(note);
            }
            session_id
        }
        (_, None) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &request,
                JsonRpcError::invalid_request("Missing Mcp-Session-Id header"),
            );
        }
    };

    match state.handler.handle_request(request).await {
        Some(response) => (
            StatusCode::OK,
            [(MCP_SESSION_HEADER, session_id)],
            Json(response),
        )
            .into_response(),
        // Notifications are accepted without a body.
        None => (StatusCode::ACCEPTED, [(MCP_SESSION_HEADER, session_id)]).into_response(),
    }
}

async fn handle_sse(State(state): State<Arc<HttpState>>, headers: HeaderMap) -> Response {
    if let Err(denied) = check_origin(&state, &headers) {
        return denied;
    }

    let Some(session_id) = header_value(&headers, MCP_SESSION_HEADER) else {
        return (StatusCode::BAD_REQUEST, "Missing Mcp-Session-Id header").into_response();
    };
    let Some(mut session) = state.sessions.get_mut(&session_id) else {
        return (StatusCode::NOT_FOUND, "Unknown session").into_response();
    };
    let Some(mut push_rx) = session.push_rx.take() else {
        return (StatusCode::CONFLICT, "Event stream already open").into_response();
    };
    drop(session);

    info!(%session_id, "MCP event stream opened");
    let guard = SessionGuard {
        state: state.clone(),
        session_id,
    };

    let stream = async_stream::stream! {
        let _guard = guard;
        while let Some(note) = push_rx.recv().await {
            yield Ok::<Event, Infallible>(
                Event::default()
                    .event("message")
                    .data(serde_json::to_string(&note).unwrap_or_default()),
            );
        }
    };

    Sse::new(stream)
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(30)))
        .into_response()
}

async fn handle_delete(State(state): State<Arc<HttpState>>, headers: HeaderMap) -> Response {
    if let Err(denied) = check_origin(&state, &headers) {
        return denied;
    }

    let Some(session_id) = header_value(&headers, MCP_SESSION_HEADER) else {
        return (StatusCode::BAD_REQUEST, "Missing Mcp-Session-Id header").into_response();
    };
    match state.sessions.remove(&session_id) {
        Some(_) => {
            info!(%session_id, "MCP session closed");
            StatusCode::NO_CONTENT.into_response()
        }
        None => (StatusCode::NOT_FOUND, "Unknown session").into_response(),
    }
}

/// Removes the session when its event stream is dropped, covering both
/// explicit close and client disconnect.
struct SessionGuard {
    state: Arc<HttpState>,
    session_id: String,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.state.sessions.remove(&self.session_id).is_some() {
            info!(session_id = %self.session_id, "MCP session torn down");
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn check_origin(state: &HttpState, headers: &HeaderMap) -> Result<(), Response> {
    let Some(origin) = headers.get(header::ORIGIN) else {
        // Non-browser clients send no Origin; session ids gate them.
        return Ok(());
    };
    let origin = origin.to_str().unwrap_or_default();

    let allowed = if state.allowed_origins.is_empty() {
        is_local_origin(origin)
    } else {
        state.allowed_origins.iter().any(|o| o == origin)
    };

    if allowed {
        Ok(())
    } else {
        warn!(%origin, "rejected origin");
        Err((StatusCode::FORBIDDEN, "Origin not allowed").into_response())
    }
}

fn is_local_origin(origin: &str) -> bool {
    url::Url::parse(origin)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
        .map(|host| host == "localhost" || host == "127.0.0.1" || host == "::1" || host == "[::1]")
        .unwrap_or(false)
}

/// Build an error response that echoes the request id when one was given.
fn error_response(status: StatusCode, request: &JsonRpcRequest, error: JsonRpcError) -> Response {
    let id = request.id.clone().unwrap_or(JsonRpcId::Null);
    (status, Json(JsonRpcResponse::error(id, error))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_origins_only_when_no_allow_list() {
        assert!(is_local_origin("http://localhost:3000"));
        assert!(is_local_origin("http://127.0.0.1:8080"));
        assert!(!is_local_origin("https://evil.example.com"));
        assert!(!is_local_origin("not a url"));
    }
}
