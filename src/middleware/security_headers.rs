// ABOUTME: Security header middleware
// ABOUTME: Stamps the configured security header set onto every response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::mcp::resources::ServerResources;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

/// Copy [`ServerResources::security_headers`] onto the response
pub async fn security_headers_middleware(
    State(resources): State<Arc<ServerResources>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for (name, value) in resources.security_headers.iter() {
        headers.insert(name.clone(), value.clone());
    }
    response
}
