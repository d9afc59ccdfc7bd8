// ABOUTME: MCP method routing for decoded JSON-RPC requests
// ABOUTME: Handles initialize, tools/list, and tools/call against a pluggable tool registry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::coercion::coerce_arguments;
use crate::metrics::ServerMetrics;
use crate::tools::ToolRegistry;
use calculator_mcp_core::constants::{
    methods, COMPATIBLE_PROTOCOL_VERSIONS, MCP_PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION,
};
use calculator_mcp_core::jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use calculator_mcp_core::protocol::{
    InitializeParams, InitializeResult, ServerCapabilities, ServerInfo, ToolCallParams,
    ToolCallResult, ToolsCapability, ToolsListResult,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Methods this server understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum McpMethod {
    /// `initialize`
    Initialize,
    /// `tools/list`
    ToolsList,
    /// `tools/call`
    ToolsCall,
    /// Anything else
    Unknown(String),
}

impl McpMethod {
    /// Classify a method name
    #[must_use]
    pub fn parse(method: &str) -> Self {
        match method {
            methods::INITIALIZE => Self::Initialize,
            methods::TOOLS_LIST => Self::ToolsList,
            methods::TOOLS_CALL => Self::ToolsCall,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

/// Routes decoded requests to their handlers
///
/// Every request yields exactly one response envelope. Tool failures become
/// `isError` results; only protocol problems become JSON-RPC errors.
pub struct McpRequestProcessor {
    registry: Arc<dyn ToolRegistry>,
    metrics: Arc<ServerMetrics>,
}

impl McpRequestProcessor {
    /// Create a processor over `registry`
    #[must_use]
    pub fn new(registry: Arc<dyn ToolRegistry>, metrics: Arc<ServerMetrics>) -> Self {
        Self { registry, metrics }
    }

    /// The tool registry backing `tools/*`
    #[must_use]
    pub fn registry(&self) -> &Arc<dyn ToolRegistry> {
        &self.registry
    }

    /// Dispatch one request and produce its response envelope
    pub async fn dispatch(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let start_time = Instant::now();
        debug!(method = %request.method, id = ?request.id, "dispatching MCP request");

        let outcome = match McpMethod::parse(&request.method) {
            McpMethod::Initialize => Self::handle_initialize(request),
            McpMethod::ToolsList => self.handle_tools_list(),
            McpMethod::ToolsCall => self.handle_tools_call(request).await,
            McpMethod::Unknown(method) => {
                warn!("Unknown MCP method: {method}");
                Err(JsonRpcError::method_not_found(&method))
            }
        };

        debug!(
            method = %request.method,
            elapsed_us = start_time.elapsed().as_micros(),
            "MCP request completed"
        );

        match outcome {
            Ok(result) => JsonRpcResponse::success(request.id.clone(), result),
            Err(error) => JsonRpcResponse::from_error(request.id.clone(), error),
        }
    }

    fn handle_initialize(request: &JsonRpcRequest) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = parse_params(request.params.as_ref(), true)?;

        match params.protocol_version.as_deref() {
            Some(version) if !COMPATIBLE_PROTOCOL_VERSIONS.contains(&version) => {
                warn!(
                    requested = version,
                    supported = MCP_PROTOCOL_VERSION,
                    "client requested unsupported protocol version"
                );
            }
            _ => {}
        }
        if let Some(client) = &params.client_info {
            info!(client.name = %client.name, client.version = %client.version, "MCP client initializing");
        }

        to_result(&InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_owned(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_owned(),
                version: SERVER_VERSION.to_owned(),
            },
        })
    }

    fn handle_tools_list(&self) -> Result<Value, JsonRpcError> {
        to_result(&ToolsListResult {
            tools: self.registry.list_tools(),
        })
    }

    async fn handle_tools_call(&self, request: &JsonRpcRequest) -> Result<Value, JsonRpcError> {
        let params: ToolCallParams = parse_params(request.params.as_ref(), false)?;

        let Some(descriptor) = self.registry.describe(&params.name) else {
            info!(tool = %params.name, "tools/call for unknown tool");
            return to_result(&ToolCallResult::failure(format!(
                "unknown tool: {}",
                params.name
            )));
        };

        let arguments = coerce_arguments(&descriptor.input_schema, &params.arguments)
            .map_err(|e| JsonRpcError::invalid_params(e.to_string()))?;

        let result = match self.registry.invoke(&params.name, &arguments).await {
            Ok(value) => {
                self.metrics.record_tool_call(false);
                ToolCallResult::success(result_text(&value), value)
            }
            Err(e) => {
                self.metrics.record_tool_call(true);
                info!(tool = %params.name, error = %e, "tool invocation failed");
                ToolCallResult::failure(e.to_string())
            }
        };

        to_result(&result)
    }
}

/// Deserialize params, treating absent params as `{}` when `optional`
fn parse_params<T: DeserializeOwned>(
    params: Option<&Value>,
    optional: bool,
) -> Result<T, JsonRpcError> {
    let value = match params {
        Some(value) => value.clone(),
        None if optional => Value::Object(serde_json::Map::new()),
        None => return Err(JsonRpcError::invalid_params("missing params")),
    };
    serde_json::from_value(value).map_err(|e| JsonRpcError::invalid_params(e.to_string()))
}

fn to_result<T: Serialize>(payload: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(payload).map_err(|e| {
        warn!("Failed to serialize MCP result: {e}");
        JsonRpcError::internal()
    })
}

fn result_text(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
