// ABOUTME: Core protocol types and constants for the calculator MCP server
// ABOUTME: Foundation crate with the JSON-RPC codec, MCP payloads, and error handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Calculator MCP Core
//!
//! Framework-independent building blocks shared by the HTTP transport:
//!
//! - **jsonrpc**: request/response envelopes, the error-code taxonomy, and the codec
//! - **protocol**: MCP payload shapes (initialize, tools/list, tools/call)
//! - **errors**: transport-level `AppError` and tool-level `ToolError`
//! - **constants**: protocol versions, method names, and header names

/// Protocol versions, method names, and HTTP header names
pub mod constants;

/// Transport and tool error types with HTTP status mapping
pub mod errors;

/// JSON-RPC 2.0 envelopes and the wire codec
pub mod jsonrpc;

/// MCP payload types carried inside JSON-RPC envelopes
pub mod protocol;
