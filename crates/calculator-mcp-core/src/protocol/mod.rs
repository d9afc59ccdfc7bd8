// ABOUTME: MCP payload types carried inside JSON-RPC envelopes
// ABOUTME: Initialize handshake, tool descriptors, and tool call params and results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! MCP payload shapes for the `initialize`, `tools/list`, and `tools/call` methods.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `initialize` request parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Protocol version requested by the client
    #[serde(default)]
    pub protocol_version: Option<String>,
    /// Client capabilities (opaque to this server)
    #[serde(default)]
    pub capabilities: Value,
    /// Client identification
    #[serde(default)]
    pub client_info: Option<ClientInfo>,
}

/// Client identification sent on `initialize`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Client name
    pub name: String,
    /// Client version
    #[serde(default)]
    pub version: String,
}

/// `initialize` result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Protocol version this server speaks
    pub protocol_version: String,
    /// Server capability descriptor
    pub capabilities: ServerCapabilities,
    /// Server identification
    pub server_info: ServerInfo,
}

/// Capabilities advertised by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Tool support
    pub tools: ToolsCapability,
}

/// Tool capability flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// Whether the server emits list-changed notifications
    pub list_changed: bool,
}

/// Server identification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

/// One callable tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Tool name used in `tools/call`
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON schema for the arguments object
    pub input_schema: InputSchema,
}

/// Object schema describing a tool's arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    /// Always `"object"`
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Argument name to property schema; ordered by name
    pub properties: std::collections::BTreeMap<String, PropertySchema>,
    /// Names of required arguments
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl InputSchema {
    /// Empty object schema
    #[must_use]
    pub fn object() -> Self {
        Self {
            schema_type: "object".to_owned(),
            properties: std::collections::BTreeMap::new(),
            required: Vec::new(),
        }
    }

    /// Add a property, marking it required when `required` is set
    #[must_use]
    pub fn property(mut self, name: &str, schema: PropertySchema, required: bool) -> Self {
        self.properties.insert(name.to_owned(), schema);
        if required {
            self.required.push(name.to_owned());
        }
        self
    }

    /// Whether `name` is required
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// Schema for a single argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// JSON type name (`number`, `integer`, `string`, `boolean`)
    #[serde(rename = "type")]
    pub property_type: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertySchema {
    /// Numeric property
    #[must_use]
    pub fn number(description: &str) -> Self {
        Self {
            property_type: "number".to_owned(),
            description: Some(description.to_owned()),
        }
    }
}

/// `tools/list` result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsListResult {
    /// Every tool the registry exposes
    pub tools: Vec<ToolDescriptor>,
}

/// `tools/call` request parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallParams {
    /// Tool to invoke
    pub name: String,
    /// Loosely typed arguments
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// One content block in a tool result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Plain text
    Text {
        /// The text
        text: String,
    },
}

/// `tools/call` result
///
/// Tool failures are reported here with `is_error` set, never as JSON-RPC errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Human-readable output
    pub content: Vec<Content>,
    /// Machine-readable output on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    /// Failure flag
    pub is_error: bool,
}

impl ToolCallResult {
    /// Successful call yielding `value`
    #[must_use]
    pub fn success(text: String, value: Value) -> Self {
        Self {
            content: vec![Content::Text { text }],
            structured_content: Some(serde_json::json!({ "result": value })),
            is_error: false,
        }
    }

    /// Failed call with a domain message
    #[must_use]
    pub fn failure(message: String) -> Self {
        Self {
            content: vec![Content::Text { text: message }],
            structured_content: None,
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_descriptor_wire_shape() {
        let tool = ToolDescriptor {
            name: "add".to_owned(),
            description: "Add two numbers together".to_owned(),
            input_schema: InputSchema::object()
                .property("a", PropertySchema::number("The first number"), true)
                .property("b", PropertySchema::number("The second number"), true),
        };

        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["inputSchema"]["type"], "object");
        assert_eq!(value["inputSchema"]["properties"]["a"]["type"], "number");
        assert_eq!(value["inputSchema"]["required"], json!(["a", "b"]));
    }

    #[test]
    fn test_tool_call_result_wire_shape() {
        let ok = serde_json::to_value(ToolCallResult::success("8".to_owned(), json!(8))).unwrap();
        assert_eq!(ok, json!({
            "content": [{"type": "text", "text": "8"}],
            "structuredContent": {"result": 8},
            "isError": false
        }));

        let failed =
            serde_json::to_value(ToolCallResult::failure("division by zero is not allowed".to_owned()))
                .unwrap();
        assert_eq!(failed["isError"], true);
        assert!(failed.get("structuredContent").is_none());
    }

    #[test]
    fn test_initialize_params_tolerate_missing_fields() {
        let params: InitializeParams = serde_json::from_value(json!({})).unwrap();
        assert!(params.protocol_version.is_none());
        assert!(params.client_info.is_none());
    }
}
