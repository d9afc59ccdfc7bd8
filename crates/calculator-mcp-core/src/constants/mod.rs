// ABOUTME: Protocol-related constants for MCP and JSON-RPC communication
// ABOUTME: Handles protocol versioning, method names, and header names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Protocol constants module

/// Protocol version and identification constants
pub mod protocol;

/// Re-export all protocol constants
pub use protocol::*;
