// ABOUTME: MCP protocol constants for version, method, and header identification
// ABOUTME: Pure compile-time constants without runtime configuration dependencies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Protocol constants for MCP and JSON-RPC

/// JSON-RPC version (standard, not configurable)
pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol version answered by this server
pub const MCP_PROTOCOL_VERSION: &str = "2025-03-26";

/// Client protocol versions accepted without a compatibility warning
pub const COMPATIBLE_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2025-03-26"];

/// Server name reported in `serverInfo`
pub const SERVER_NAME: &str = "calculator-mcp-server";

/// Server version from Cargo.toml
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON-RPC method names understood by the method router
pub mod methods {
    /// Session handshake
    pub const INITIALIZE: &str = "initialize";
    /// Tool catalogue listing
    pub const TOOLS_LIST: &str = "tools/list";
    /// Tool invocation
    pub const TOOLS_CALL: &str = "tools/call";
    /// Prefix reserved for one-way messages
    pub const NOTIFICATION_PREFIX: &str = "notifications/";
}

/// HTTP header names used by the streamable HTTP transport
pub mod headers {
    /// Session identifier header
    pub const MCP_SESSION_ID: &str = "mcp-session-id";
    /// Negotiated protocol version header
    pub const MCP_PROTOCOL_VERSION: &str = "mcp-protocol-version";
    /// SSE resumption header sent by reconnecting clients
    pub const LAST_EVENT_ID: &str = "last-event-id";
}

/// SSE event names emitted by the transport
pub mod events {
    /// Protocol response event on POST
    pub const MESSAGE: &str = "message";
    /// First event on a GET stream
    pub const CONNECTED: &str = "connected";
    /// Periodic liveness event on a GET stream
    pub const HEARTBEAT: &str = "heartbeat";
}
