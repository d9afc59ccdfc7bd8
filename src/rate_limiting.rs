// ABOUTME: Fixed-window request rate limiter keyed by client address
// ABOUTME: Concurrent per-address counters with idle-entry purging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Rate Limiting Engine
//!
//! Each client address gets a fixed window of `requests_per_window` requests.
//! The check-and-increment for one address happens under that address's map
//! shard lock, so concurrent requests never overshoot the limit.

use crate::config::environment::RateLimitConfig;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};
use tracing::debug;

/// Bucket shared by requests whose peer address is unknown
pub const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Outcome of one rate limit check
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitInfo {
    /// Whether the request must be rejected
    pub is_rate_limited: bool,
    /// Requests allowed per window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the current window ends
    pub reset_at: DateTime<Utc>,
    /// Window length in seconds
    pub window_seconds: u64,
}

impl RateLimitInfo {
    /// Whole seconds until the window resets, at least 1 when limited
    #[must_use]
    pub fn retry_after_secs(&self) -> i64 {
        let seconds = (self.reset_at - Utc::now()).num_milliseconds().max(0);
        // Round up so clients never retry inside the current window
        let rounded = (seconds + 999) / 1000;
        if self.is_rate_limited {
            rounded.max(1)
        } else {
            rounded
        }
    }
}

#[derive(Debug)]
struct WindowState {
    window_start: Instant,
    count: u32,
    last_seen: Instant,
}

/// Per-address fixed-window limiter
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    idle_after: Duration,
    windows: DashMap<IpAddr, WindowState>,
}

impl RateLimiter {
    /// Limiter enforcing `config`
    #[must_use]
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            limit: config.requests_per_window,
            window: Duration::from_secs(config.window_seconds),
            idle_after: Duration::from_secs(config.idle_purge_secs),
            windows: DashMap::new(),
        }
    }

    /// Count a request from `client` and report whether it is allowed
    pub fn check(&self, client: IpAddr) -> RateLimitInfo {
        let now = Instant::now();
        let mut state = self.windows.entry(client).or_insert_with(|| WindowState {
            window_start: now,
            count: 0,
            last_seen: now,
        });

        if now.duration_since(state.window_start) >= self.window {
            state.window_start = now;
            state.count = 0;
        }
        state.last_seen = now;

        let is_rate_limited = state.count >= self.limit;
        if !is_rate_limited {
            state.count += 1;
        }

        let remaining = self.limit.saturating_sub(state.count);
        let window_left = self
            .window
            .saturating_sub(now.duration_since(state.window_start));
        drop(state);

        let reset_at = Utc::now()
            + chrono::Duration::from_std(window_left).unwrap_or_else(|_| chrono::Duration::zero());

        RateLimitInfo {
            is_rate_limited,
            limit: self.limit,
            remaining,
            reset_at,
            window_seconds: self.window.as_secs(),
        }
    }

    /// Drop entries for addresses not seen within the idle period; returns how many
    pub fn purge_idle(&self) -> usize {
        let before = self.windows.len();
        let idle_after = self.idle_after;
        self.windows
            .retain(|_, state| state.last_seen.elapsed() < idle_after);
        let purged = before.saturating_sub(self.windows.len());
        if purged > 0 {
            debug!(purged, "idle rate limit entries purged");
        }
        purged
    }

    /// Number of tracked addresses
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}
