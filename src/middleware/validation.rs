// ABOUTME: Request shape validation ahead of the MCP handlers
// ABOUTME: Rejects declared oversize bodies with 413 and non-JSON POST bodies with 415
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::content_types;
use crate::mcp::resources::ServerResources;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use calculator_mcp_core::errors::AppError;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, Method};
use std::sync::Arc;
use tracing::debug;

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Whether the Content-Type media type is `application/json`, parameters allowed
#[must_use]
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|media_type| media_type.trim().eq_ignore_ascii_case(content_types::JSON))
}

/// Reject requests whose declared size or media type is unacceptable
///
/// Bodies without a Content-Length are bounded again when the handler reads them.
pub async fn validation_middleware(
    State(resources): State<Arc<ServerResources>>,
    request: Request,
    next: Next,
) -> Response {
    let limit = resources.config.http.max_body_bytes;

    if let Some(length) = declared_length(request.headers()) {
        if length > limit as u64 {
            debug!(length, limit, "request body exceeds limit");
            return AppError::payload_too_large(limit).into_response();
        }
    }

    if request.method() == Method::POST && !is_json_content_type(request.headers()) {
        debug!("POST with non-JSON content type");
        return AppError::unsupported_media_type().into_response();
    }

    next.run(request).await
}
