// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Exposes the environment-driven ServerConfig and its sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the calculator MCP server

/// Environment and server configuration
pub mod environment;

pub use environment::{
    CorsConfig, Environment, HttpConfig, LogLevel, RateLimitConfig, ServerConfig, SessionConfig,
    SseConfig,
};
