// ABOUTME: MCP streamable HTTP route handlers for JSON-RPC over Server-Sent Events
// ABOUTME: POST answers with one SSE event, GET opens a heartbeat stream, DELETE ends a session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! MCP protocol routes
//!
//! All three verbs share the `/mcp` path and the `mcp-session-id` header.
//! `initialize` is the only method that may arrive without a session.

use crate::constants::{content_types, headers, methods};
use crate::mcp::resources::ServerResources;
use crate::sse::{heartbeat_stream, SseEvent};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use bytes::Bytes;
use calculator_mcp_core::errors::AppError;
use calculator_mcp_core::jsonrpc::{codec, JsonRpcResponse};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use std::sync::Arc;
use tracing::{debug, error, info};

/// `Cache-Control` for every event-stream response
const NO_CACHE: &str = "no-cache, no-transform";

/// MCP transport routes
pub struct McpRoutes;

impl McpRoutes {
    /// Create the `/mcp` route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/mcp",
                post(Self::handle_post)
                    .get(Self::handle_get)
                    .delete(Self::handle_delete),
            )
            .with_state(resources)
    }

    /// Handle one JSON-RPC message
    async fn handle_post(
        State(resources): State<Arc<ServerResources>>,
        request: Request,
    ) -> Result<Response, AppError> {
        if !accepts_sse_response(request.headers()) {
            return Err(AppError::not_acceptable());
        }

        let supplied_session = session_header(request.headers());
        let body = read_body(request.into_body(), resources.config.http.max_body_bytes).await?;

        let message = match codec::decode(&body) {
            Ok(message) => message,
            Err(e) => {
                debug!(code = e.code(), "rejected malformed message: {e}");
                return sse_response(&e.to_response(), supplied_session.as_deref());
            }
        };

        // None here means an initialize that has not been confirmed yet
        let known_session = match supplied_session {
            Some(id) if resources.sessions.contains(&id).await => Some(id),
            Some(_) => return Err(AppError::session_not_found()),
            None if message.method == methods::INITIALIZE => None,
            None => return Err(AppError::session_required()),
        };

        if message.is_notification() {
            debug!(method = %message.method, session_id = ?known_session, "notification accepted");
            let mut response = StatusCode::ACCEPTED.into_response();
            if let Some(id) = &known_session {
                insert_session_header(response.headers_mut(), id);
            }
            return Ok(response);
        }

        let reply = resources.processor.dispatch(&message).await;
        let session_id = match known_session {
            Some(id) => Some(id),
            None if !reply.is_error() => Some(resources.sessions.create().await),
            None => {
                debug!("initialize failed, no session created");
                None
            }
        };
        sse_response(&reply, session_id.as_deref())
    }

    /// Open the server-to-client heartbeat stream
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        request_headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let session_id = session_header(&request_headers).ok_or_else(AppError::session_required)?;
        if !resources.sessions.contains(&session_id).await {
            return Err(AppError::session_not_found());
        }

        let guard = resources.connections.register(&session_id);
        info!(
            session_id = %session_id,
            connection_id = %guard.connection_id(),
            "event stream opened"
        );

        let stream = heartbeat_stream(guard, session_id.clone(), resources.config.heartbeat_interval());
        let mut response = Response::new(Body::from_stream(stream));
        insert_sse_headers(response.headers_mut());
        insert_session_header(response.headers_mut(), &session_id);
        Ok(response)
    }

    /// Terminate a session and close its streams
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        request_headers: HeaderMap,
    ) -> Result<StatusCode, AppError> {
        let session_id = session_header(&request_headers).ok_or_else(AppError::session_required)?;
        if !resources.sessions.delete(&session_id).await {
            return Err(AppError::session_not_found());
        }

        let closed = resources.connections.close_session(&session_id);
        info!(session_id = %session_id, closed_streams = closed, "session terminated");
        Ok(StatusCode::OK)
    }
}

/// Whether any `Accept` value admits an event-stream reply
fn accepts_sse_response(request_headers: &HeaderMap) -> bool {
    request_headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains(content_types::EVENT_STREAM) || value.contains("*/*"))
}

fn session_header(request_headers: &HeaderMap) -> Option<String> {
    request_headers
        .get(headers::MCP_SESSION_ID)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

async fn read_body(body: Body, limit: usize) -> Result<Bytes, AppError> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(AppError::payload_too_large(limit))
        }
        Err(e) => Err(AppError::bad_request(format!("Failed to read request body: {e}"))),
    }
}

fn insert_session_header(response_headers: &mut HeaderMap, session_id: &str) {
    if let Ok(value) = HeaderValue::from_str(session_id) {
        response_headers.insert(headers::MCP_SESSION_ID, value);
    }
}

fn insert_sse_headers(response_headers: &mut HeaderMap) {
    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_types::EVENT_STREAM),
    );
    response_headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    response_headers.insert("x-accel-buffering", HeaderValue::from_static("no"));
}

/// Frame `reply` as the single SSE event of a 200 response
fn sse_response(reply: &JsonRpcResponse, session_id: Option<&str>) -> Result<Response, AppError> {
    let payload = codec::encode(reply).map_err(|e| {
        error!("failed to encode JSON-RPC response: {e}");
        AppError::internal()
    })?;
    let data = String::from_utf8(payload).map_err(|e| {
        error!("encoded response is not UTF-8: {e}");
        AppError::internal()
    })?;

    let mut response = Response::new(Body::from(SseEvent::message(data).to_bytes()));
    insert_sse_headers(response.headers_mut());
    if let Some(id) = session_id {
        insert_session_header(response.headers_mut(), id);
    }
    Ok(response)
}
