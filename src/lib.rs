// ABOUTME: Main library entry point for the calculator MCP server
// ABOUTME: Streamable HTTP transport for the Model Context Protocol with pluggable tools
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Calculator MCP Server
//!
//! A Model Context Protocol (MCP) server speaking JSON-RPC 2.0 over HTTP, with
//! responses framed as Server-Sent Events.
//!
//! ## Features
//!
//! - **Single endpoint**: `POST /mcp` sends a message, `GET /mcp` opens a heartbeat
//!   stream, `DELETE /mcp` ends the session
//! - **Sessions**: minted by `initialize` and carried in the `mcp-session-id` header
//! - **Pluggable tools**: any [`tools::ToolRegistry`]; the default serves arithmetic
//! - **Middleware chain**: access log, panic recovery, security headers, validation,
//!   per-address rate limiting, and a request deadline
//!
//! ## Architecture
//!
//! - **Core crate**: JSON-RPC envelopes, MCP payload types, and error types
//! - **Routes**: the transport dispatcher for `/mcp` plus health and metrics
//! - **MCP**: method routing and argument coercion over the tool registry
//! - **SSE**: event framing and the open-stream registry
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use calculator_mcp_server::config::environment::ServerConfig;
//! use calculator_mcp_server::mcp::resources::ServerResources;
//! use calculator_mcp_server::server::McpHttpServer;
//! use calculator_mcp_server::tools::CalculatorRegistry;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::new(config, Arc::new(CalculatorRegistry)));
//!     McpHttpServer::new(resources).run().await
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Protocol constants and server defaults
pub mod constants;

/// Production logging and structured output
pub mod logging;

/// Method routing, argument coercion, and shared resources
pub mod mcp;

/// Process-wide counters
pub mod metrics;

/// HTTP middleware chain
pub mod middleware;

/// Per-address fixed-window rate limiter
pub mod rate_limiting;

/// HTTP routes
pub mod routes;

/// Security header profiles
pub mod security;

/// Listener, background sweepers, and graceful shutdown
pub mod server;

/// In-memory session store
pub mod session;

/// Server-Sent Events framing and streams
pub mod sse;

/// Tool registry seam and the calculator backend
pub mod tools;

pub use calculator_mcp_core::{errors, jsonrpc, protocol};
