// ABOUTME: Model Context Protocol method handling over decoded JSON-RPC requests
// ABOUTME: Method routing, argument coercion, and the shared resource container
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Schema-driven tool argument coercion
pub mod coercion;
/// Method routing
pub mod mcp_request_processor;
/// Shared server state
pub mod resources;

pub use mcp_request_processor::{McpMethod, McpRequestProcessor};
pub use resources::ServerResources;
