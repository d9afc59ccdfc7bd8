// ABOUTME: Health check and metrics route handlers for service monitoring
// ABOUTME: Liveness answer plus a JSON snapshot of connection, session, and request counters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring
//!
//! Neither route requires a session.

use crate::constants::{service_names, SERVER_VERSION};
use crate::mcp::resources::ServerResources;
use crate::metrics::MetricsSnapshot;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/metrics", get(Self::handle_metrics))
            .with_state(resources)
    }

    async fn handle_health() -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "status": "healthy",
            "service": service_names::CALCULATOR_MCP_SERVER,
            "version": SERVER_VERSION,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn handle_metrics(
        State(resources): State<Arc<ServerResources>>,
    ) -> Json<MetricsSnapshot> {
        let active_sessions = resources.sessions.len().await;
        Json(
            resources
                .metrics
                .snapshot(resources.connections.active_count(), active_sessions),
        )
    }
}
