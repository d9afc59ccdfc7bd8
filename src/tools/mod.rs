// ABOUTME: Pluggable tool-execution backend consumed by the MCP method router
// ABOUTME: Defines the ToolRegistry seam and ships the calculator implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tools
//!
//! The router owns protocol concerns (argument coercion, result wrapping); a
//! [`ToolRegistry`] only lists descriptors and executes already-coerced calls.

/// Arithmetic tools: add, subtract, multiply, divide
pub mod calculator;

/// The `ToolRegistry` trait
pub mod registry;

pub use calculator::CalculatorRegistry;
pub use registry::ToolRegistry;
