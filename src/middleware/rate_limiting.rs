// ABOUTME: Rate limiting middleware for HTTP requests
// ABOUTME: Enforces per-address request limits and reports them through standard headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Rate Limiting Middleware with HTTP Headers
//!
//! Adds standard rate limiting headers to responses and answers 429 when the
//! caller's address has exhausted its window.

use crate::mcp::resources::ServerResources;
use crate::rate_limiting::{RateLimitInfo, UNKNOWN_CLIENT};
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use calculator_mcp_core::errors::AppError;
use http::{HeaderMap, HeaderValue};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::warn;

/// HTTP header names for rate limiting
pub mod headers {
    /// HTTP header name for maximum requests allowed in the current window
    pub const X_RATE_LIMIT_LIMIT: &str = "X-RateLimit-Limit";
    /// HTTP header name for remaining requests in the current window
    pub const X_RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";
    /// HTTP header name for Unix timestamp when rate limit resets
    pub const X_RATE_LIMIT_RESET: &str = "X-RateLimit-Reset";
    /// HTTP header name for rate limit window duration in seconds
    pub const X_RATE_LIMIT_WINDOW: &str = "X-RateLimit-Window";
    /// HTTP header name for retry-after duration in seconds
    pub const RETRY_AFTER: &str = "Retry-After";
}

/// Create a `HeaderMap` with rate limit headers
///
/// `Retry-After` is only included when the request was rejected.
#[must_use]
pub fn create_rate_limit_headers(rate_limit_info: &RateLimitInfo) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(
        headers::X_RATE_LIMIT_LIMIT,
        HeaderValue::from(rate_limit_info.limit),
    );
    headers.insert(
        headers::X_RATE_LIMIT_REMAINING,
        HeaderValue::from(rate_limit_info.remaining),
    );
    headers.insert(
        headers::X_RATE_LIMIT_RESET,
        HeaderValue::from(rate_limit_info.reset_at.timestamp()),
    );
    headers.insert(
        headers::X_RATE_LIMIT_WINDOW,
        HeaderValue::from(rate_limit_info.window_seconds),
    );

    if rate_limit_info.is_rate_limited {
        headers.insert(
            headers::RETRY_AFTER,
            HeaderValue::from(rate_limit_info.retry_after_secs()),
        );
    }

    headers
}

/// Create a rate limit exceeded error
#[must_use]
pub fn create_rate_limit_error(rate_limit_info: &RateLimitInfo) -> AppError {
    AppError::rate_limit_exceeded(rate_limit_info.limit, rate_limit_info.window_seconds)
}

/// Throttle requests per peer address
///
/// Requests without a known peer address share one bucket.
pub async fn rate_limit_middleware(
    State(resources): State<Arc<ServerResources>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    if !resources.config.rate_limit.enabled {
        return next.run(request).await;
    }

    let client = connect_info.map_or(UNKNOWN_CLIENT, |ConnectInfo(addr)| addr.ip());
    let rate_limit_info = resources.rate_limiter.check(client);

    if rate_limit_info.is_rate_limited {
        resources.metrics.record_rate_limited();
        warn!(
            %client,
            limit = rate_limit_info.limit,
            window_seconds = rate_limit_info.window_seconds,
            "rate limit exceeded"
        );
        let mut response = create_rate_limit_error(&rate_limit_info).into_response();
        response
            .headers_mut()
            .extend(create_rate_limit_headers(&rate_limit_info));
        return response;
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .extend(create_rate_limit_headers(&rate_limit_info));
    response
}
