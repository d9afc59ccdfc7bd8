// ABOUTME: HTTP server lifecycle for the MCP transport
// ABOUTME: Binds the listener, runs background sweepers, and drains connections on shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Lifecycle
//!
//! [`McpHttpServer`] owns the shared [`ServerResources`] for one process. On a
//! shutdown signal every open SSE stream is closed first so that the graceful
//! drain can complete; the drain itself is bounded by the configured timeout.

use crate::mcp::resources::ServerResources;
use crate::routes::build_router;
use anyhow::{Context, Result};
use axum::Router;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// MCP streamable HTTP server
pub struct McpHttpServer {
    resources: Arc<ServerResources>,
}

impl McpHttpServer {
    /// Create a server over shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Shared resources
    #[must_use]
    pub const fn resources(&self) -> &Arc<ServerResources> {
        &self.resources
    }

    /// Router with the full middleware chain
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.resources))
    }

    /// Bind the configured address and serve until SIGINT or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the server fails.
    pub async fn run(self) -> Result<()> {
        let address = self.resources.config.address();
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves
    ///
    /// # Errors
    ///
    /// Returns an error if the listener address is unavailable or the server fails.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener
            .local_addr()
            .context("Failed to read listener address")?;
        info!(address = %local_addr, "MCP endpoint: http://{local_addr}/mcp");

        let background = BackgroundTasks::spawn(&self.resources);
        let drain_started = Arc::new(Notify::new());

        let graceful = {
            let resources = Arc::clone(&self.resources);
            let drain_started = Arc::clone(&drain_started);
            async move {
                shutdown.await;
                let closed = resources.connections.close_all();
                info!(closed_streams = closed, "shutdown requested, draining connections");
                drain_started.notify_one();
            }
        };

        let app = self
            .router()
            .into_make_service_with_connect_info::<SocketAddr>();
        let server = axum::serve(listener, app)
            .with_graceful_shutdown(graceful)
            .into_future();

        let drain_timeout = self.resources.config.shutdown_timeout();
        let result = tokio::select! {
            served = server => served.context("HTTP server failed"),
            () = drain_deadline(&drain_started, drain_timeout) => {
                warn!(
                    timeout_secs = drain_timeout.as_secs(),
                    "graceful shutdown timed out, abandoning open connections"
                );
                Ok(())
            }
        };

        background.abort();
        let dropped = self.resources.sessions.clear().await;
        info!(dropped_sessions = dropped, "server stopped");
        result
    }
}

async fn drain_deadline(drain_started: &Notify, timeout: Duration) {
    drain_started.notified().await;
    tokio::time::sleep(timeout).await;
}

/// Periodic maintenance tasks tied to the server's lifetime
struct BackgroundTasks {
    handles: Vec<JoinHandle<()>>,
}

impl BackgroundTasks {
    fn spawn(resources: &Arc<ServerResources>) -> Self {
        let mut handles = Vec::with_capacity(2);
        if let Some(handle) = spawn_session_sweeper(resources) {
            handles.push(handle);
        }
        if resources.config.rate_limit.enabled {
            handles.push(spawn_rate_limit_purge(resources));
        }
        Self { handles }
    }

    fn abort(self) {
        for handle in self.handles {
            handle.abort();
        }
    }
}

fn spawn_session_sweeper(resources: &Arc<ServerResources>) -> Option<JoinHandle<()>> {
    let ttl_secs = resources.config.session.ttl_secs;
    if ttl_secs == 0 {
        debug!("session expiry disabled");
        return None;
    }

    let ttl = Duration::from_secs(ttl_secs);
    let period = Duration::from_secs(resources.config.session.sweep_interval_secs.max(1));
    let resources = Arc::clone(resources);

    Some(tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let expired = resources.sessions.purge_expired(ttl).await;
            if expired.is_empty() {
                continue;
            }
            let closed: usize = expired
                .iter()
                .map(|id| resources.connections.close_session(id))
                .sum();
            info!(
                expired_sessions = expired.len(),
                closed_streams = closed,
                "expired sessions removed"
            );
        }
    }))
}

fn spawn_rate_limit_purge(resources: &Arc<ServerResources>) -> JoinHandle<()> {
    let period = Duration::from_secs(resources.config.rate_limit.cleanup_interval_secs.max(1));
    let limiter = Arc::clone(&resources.rate_limiter);

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            limiter.purge_idle();
        }
    })
}

/// Resolves on Ctrl+C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Ctrl+C received"),
        () = terminate => info!("SIGTERM received"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::environment::ServerConfig;
    use crate::tools::CalculatorRegistry;
    use tokio::sync::oneshot;

    fn resources(config: ServerConfig) -> Arc<ServerResources> {
        Arc::new(ServerResources::new(config, Arc::new(CalculatorRegistry)))
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown_signal() {
        let server = McpHttpServer::new(resources(ServerConfig::default()));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(server.serve(listener, async move {
            let _ = rx.await;
        }));
        tx.send(()).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_drops_sessions() {
        let resources = resources(ServerConfig::default());
        resources.sessions.create().await;
        resources.sessions.create().await;
        let server = McpHttpServer::new(Arc::clone(&resources));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

        let served = tokio::time::timeout(Duration::from_secs(5), server.serve(listener, async {}))
            .await
            .unwrap();
        assert!(served.is_ok());
        assert!(resources.sessions.is_empty().await);
    }

    #[tokio::test]
    async fn test_session_sweeper_disabled_for_zero_ttl() {
        let mut config = ServerConfig::default();
        config.session.ttl_secs = 0;
        assert!(spawn_session_sweeper(&resources(config)).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_sweeper_removes_expired_sessions() {
        let mut config = ServerConfig::default();
        config.session.ttl_secs = 1;
        config.session.sweep_interval_secs = 1;
        let resources = resources(config);
        let id = resources.sessions.create().await;

        let handle = spawn_session_sweeper(&resources).unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        handle.abort();

        assert!(!resources.sessions.contains(&id).await);
    }
}
