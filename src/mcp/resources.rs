// ABOUTME: Centralized resource container shared by every handler and middleware
// ABOUTME: Holds configuration, session and stream registries, limiter, metrics, and the method router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources Module
//!
//! Built once at startup and handed to the router as `Arc<ServerResources>` state.

use super::mcp_request_processor::McpRequestProcessor;
use crate::config::environment::ServerConfig;
use crate::metrics::ServerMetrics;
use crate::rate_limiting::RateLimiter;
use crate::security::SecurityConfig;
use crate::session::SessionStore;
use crate::sse::ConnectionRegistry;
use crate::tools::ToolRegistry;
use http::HeaderMap;
use std::sync::Arc;

/// Shared server state
pub struct ServerResources {
    /// Validated configuration
    pub config: Arc<ServerConfig>,
    /// Live MCP sessions
    pub sessions: Arc<SessionStore>,
    /// Open GET streams
    pub connections: Arc<ConnectionRegistry>,
    /// JSON-RPC method router
    pub processor: Arc<McpRequestProcessor>,
    /// Per-address request limiter
    pub rate_limiter: Arc<RateLimiter>,
    /// Process counters
    pub metrics: Arc<ServerMetrics>,
    /// Headers stamped onto every response
    pub security_headers: Arc<HeaderMap>,
}

impl ServerResources {
    /// Wire up resources for `config`, serving tools from `registry`
    #[must_use]
    pub fn new(config: ServerConfig, registry: Arc<dyn ToolRegistry>) -> Self {
        let metrics = Arc::new(ServerMetrics::new());
        let processor = Arc::new(McpRequestProcessor::new(registry, Arc::clone(&metrics)));
        let rate_limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        let security_headers =
            Arc::new(SecurityConfig::from_environment(config.environment).to_header_map());

        Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionStore::new()),
            connections: Arc::new(ConnectionRegistry::new()),
            processor,
            rate_limiter,
            metrics,
            security_headers,
        }
    }
}
