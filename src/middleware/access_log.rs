// ABOUTME: Structured access log for every HTTP request
// ABOUTME: Records method, path, peer address, request id, status, and latency
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::request_id::RequestId;
use crate::mcp::resources::ServerResources;
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};

/// Log one line per request and count it
///
/// 5xx responses log at error, 4xx at warn, everything else at info.
pub async fn access_log_middleware(
    State(resources): State<Arc<ServerResources>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let remote_addr =
        connect_info.map_or_else(|| "unknown".to_owned(), |ConnectInfo(addr)| addr.to_string());
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map_or_else(String::new, ToString::to_string);

    let span = info_span!(
        "http_request",
        method = %method,
        path = %path,
        request_id = %request_id,
    );
    let response = next.run(request).instrument(span).await;

    resources.metrics.record_request();
    let status = response.status().as_u16();
    let duration_ms = start_time.elapsed().as_millis();

    if response.status().is_server_error() {
        error!(%method, %path, %remote_addr, %request_id, status, duration_ms, "request failed");
    } else if response.status().is_client_error() {
        warn!(%method, %path, %remote_addr, %request_id, status, duration_ms, "request rejected");
    } else {
        info!(%method, %path, %remote_addr, %request_id, status, duration_ms, "request completed");
    }

    response
}
