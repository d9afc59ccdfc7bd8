// ABOUTME: ToolRegistry trait implemented by tool-execution backends
// ABOUTME: Lists tool descriptors and executes calls with coerced arguments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use calculator_mcp_core::errors::ToolError;
use calculator_mcp_core::protocol::ToolDescriptor;
use serde_json::{Map, Value};

/// External collaborator that owns and executes named tools.
///
/// Implementations are shared across request tasks behind an `Arc` and must not
/// hold session or transport state. Arguments arrive already coerced to match the
/// descriptor's schema; a returned [`ToolError`] is a domain failure that the
/// caller reports with `isError: true`.
#[async_trait]
pub trait ToolRegistry: Send + Sync {
    /// Every tool this registry exposes, in a stable order
    fn list_tools(&self) -> Vec<ToolDescriptor>;

    /// Descriptor for `name`, if registered
    fn describe(&self, name: &str) -> Option<ToolDescriptor> {
        self.list_tools().into_iter().find(|tool| tool.name == name)
    }

    /// Execute `name` with `arguments`
    async fn invoke(&self, name: &str, arguments: &Map<String, Value>)
        -> Result<Value, ToolError>;
}
