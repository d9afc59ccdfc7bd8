// ABOUTME: Route module organization for the calculator MCP server HTTP endpoints
// ABOUTME: Assembles the MCP and health routes behind the ordered middleware chain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the calculator MCP server
//!
//! Each domain module contains route definitions and thin handlers over
//! [`ServerResources`]. [`build_router`] applies the middleware chain, from
//! outermost to innermost:
//!
//! 1. request id
//! 2. access log
//! 3. panic recovery
//! 4. security headers
//! 5. CORS
//! 6. request validation
//! 7. rate limiting
//! 8. deadline

/// Health check and metrics routes
pub mod health;
/// Model Context Protocol (MCP) transport routes
pub mod mcp;

pub use health::HealthRoutes;
pub use mcp::McpRoutes;

use crate::mcp::resources::ServerResources;
use crate::middleware::{
    access_log_middleware, deadline_middleware, rate_limit_middleware, recovery_layer,
    request_id_middleware, security_headers_middleware, setup_cors, validation_middleware,
};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use std::sync::Arc;

/// Build the complete application router
///
/// Layers are added innermost first; the last `.layer` call runs first.
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(McpRoutes::routes(Arc::clone(&resources)))
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .layer(from_fn_with_state(Arc::clone(&resources), deadline_middleware))
        .layer(from_fn_with_state(Arc::clone(&resources), rate_limit_middleware))
        .layer(from_fn_with_state(Arc::clone(&resources), validation_middleware))
        .layer(setup_cors(&resources.config))
        .layer(from_fn_with_state(
            Arc::clone(&resources),
            security_headers_middleware,
        ))
        .layer(recovery_layer())
        .layer(from_fn_with_state(resources, access_log_middleware))
        .layer(from_fn(request_id_middleware))
}
