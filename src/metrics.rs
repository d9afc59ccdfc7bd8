// ABOUTME: Process-wide counters for requests, throttling, and tool invocations
// ABOUTME: Lock-free atomics with a serializable point-in-time snapshot for the metrics endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Server counters
#[derive(Debug)]
pub struct ServerMetrics {
    started: Instant,
    requests_total: AtomicU64,
    rate_limited_total: AtomicU64,
    tool_calls_total: AtomicU64,
    tool_failures_total: AtomicU64,
}

/// Serializable view of [`ServerMetrics`] plus live gauges
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Open SSE streams
    pub active_connections: usize,
    /// Live sessions
    pub active_sessions: usize,
    /// Requests seen by the access log
    pub requests_total: u64,
    /// Requests rejected with 429
    pub rate_limited_total: u64,
    /// `tools/call` invocations that reached the registry
    pub tool_calls_total: u64,
    /// Invocations that returned a tool error
    pub tool_failures_total: u64,
    /// Seconds since the server started
    pub uptime_seconds: u64,
    /// RFC 3339 capture time
    pub timestamp: String,
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerMetrics {
    /// Zeroed counters starting the uptime clock now
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            requests_total: AtomicU64::new(0),
            rate_limited_total: AtomicU64::new(0),
            tool_calls_total: AtomicU64::new(0),
            tool_failures_total: AtomicU64::new(0),
        }
    }

    /// Count one completed request
    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one throttled request
    pub fn record_rate_limited(&self) {
        self.rate_limited_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one tool invocation and whether it failed
    pub fn record_tool_call(&self, failed: bool) {
        self.tool_calls_total.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.tool_failures_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Requests seen so far
    #[must_use]
    pub fn requests_total(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    /// Throttled requests so far
    #[must_use]
    pub fn rate_limited_total(&self) -> u64 {
        self.rate_limited_total.load(Ordering::Relaxed)
    }

    /// Capture the counters together with the supplied gauges
    #[must_use]
    pub fn snapshot(&self, active_connections: usize, active_sessions: usize) -> MetricsSnapshot {
        MetricsSnapshot {
            active_connections,
            active_sessions,
            requests_total: self.requests_total(),
            rate_limited_total: self.rate_limited_total(),
            tool_calls_total: self.tool_calls_total.load(Ordering::Relaxed),
            tool_failures_total: self.tool_failures_total.load(Ordering::Relaxed),
            uptime_seconds: self.started.elapsed().as_secs(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
