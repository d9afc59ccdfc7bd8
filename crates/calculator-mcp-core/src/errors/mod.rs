// ABOUTME: Unified error handling for the calculator MCP transport
// ABOUTME: Re-exports transport-level AppError and tool-level ToolError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error Types
//!
//! Three failure layers exist and never mix:
//!
//! - **Transport** (`AppError`): surfaced as an HTTP status before any envelope is built
//! - **Protocol** (`crate::jsonrpc::JsonRpcError`): carried inside a 200 SSE event
//! - **Tool** (`ToolError`): folded into a successful result with `isError: true`

mod app;
mod tool;

pub use app::{AppError, AppResult, ErrorCode, ErrorResponse, ErrorResponseDetails};
pub use tool::ToolError;
