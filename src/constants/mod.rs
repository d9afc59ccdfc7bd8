// ABOUTME: System-wide constants and configuration defaults for the calculator MCP server
// ABOUTME: Re-exports protocol constants from the core crate alongside server defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Protocol constants live in `calculator_mcp_core`; server defaults live here.

pub use calculator_mcp_core::constants::{
    events, headers, methods, COMPATIBLE_PROTOCOL_VERSIONS, JSONRPC_VERSION,
    MCP_PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION,
};

/// Default values for every environment-driven setting
pub mod defaults {
    /// Bind address
    pub const HOST: &str = "127.0.0.1";
    /// Bind port
    pub const PORT: u16 = 8080;
    /// Request body ceiling (1 MiB)
    pub const MAX_BODY_BYTES: usize = 1 << 20;
    /// Deadline for non-streaming requests
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Requests allowed per address per window
    pub const RATE_LIMIT_PER_WINDOW: u32 = 100;
    /// Rate-limit window length
    pub const RATE_LIMIT_WINDOW_SECS: u64 = 1;
    /// Limiter entries idle this long are purged
    pub const RATE_LIMIT_IDLE_SECS: u64 = 300;
    /// Limiter purge period
    pub const RATE_LIMIT_CLEANUP_SECS: u64 = 60;
    /// Heartbeat period on GET streams
    pub const SSE_HEARTBEAT_SECS: u64 = 30;
    /// Session expiry age
    pub const SESSION_TTL_SECS: u64 = 86_400;
    /// Session expiry sweep period
    pub const SESSION_SWEEP_SECS: u64 = 300;
    /// Graceful shutdown bound
    pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
    /// Allow every origin
    pub const CORS_ALLOWED_ORIGINS: &str = "*";
}

/// Service names for structured logging
pub mod service_names {
    /// Main server
    pub const CALCULATOR_MCP_SERVER: &str = "calculator-mcp-server";
}

/// Media types the transport negotiates
pub mod content_types {
    /// SSE
    pub const EVENT_STREAM: &str = "text/event-stream";
    /// JSON
    pub const JSON: &str = "application/json";
}
