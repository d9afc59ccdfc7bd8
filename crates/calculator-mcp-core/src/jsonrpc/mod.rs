// ABOUTME: JSON-RPC 2.0 envelope types shared by the MCP transport
// ABOUTME: Provides request, response, error, and identifier types plus the error-code taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # JSON-RPC 2.0 Foundation
//!
//! Envelope types for the MCP transport. A response carries exactly one of a result
//! or an error; [`ResponsePayload`] makes the other combination unrepresentable.
//!
//! ## Usage
//!
//! ```rust
//! use calculator_mcp_core::jsonrpc::{codec, JsonRpcResponse, RequestId};
//! # use serde_json::json;
//!
//! let request = codec::decode(br#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#).unwrap();
//! let response = JsonRpcResponse::success(request.id.clone(), json!({"tools": []}));
//! let bytes = codec::encode(&response).unwrap();
//! assert!(bytes.ends_with(br#""id":7}"#));
//! ```

/// Wire codec: bytes to envelopes and back
pub mod codec;

use crate::constants::{methods, JSONRPC_VERSION};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    /// Invalid JSON was received
    pub const PARSE_ERROR: i32 = -32700;
    /// The JSON sent is not a valid request object
    pub const INVALID_REQUEST: i32 = -32600;
    /// The method does not exist
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid method parameters
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal JSON-RPC error
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Canonical messages paired with [`error_codes`]
pub mod error_messages {
    /// Message for `PARSE_ERROR`
    pub const PARSE_ERROR: &str = "Parse error";
    /// Message for `INVALID_REQUEST`
    pub const INVALID_REQUEST: &str = "Invalid Request";
    /// Message for `METHOD_NOT_FOUND`
    pub const METHOD_NOT_FOUND: &str = "Method not found";
    /// Message for `INVALID_PARAMS`
    pub const INVALID_PARAMS: &str = "Invalid params";
    /// Message for `INTERNAL_ERROR`
    pub const INTERNAL_ERROR: &str = "Internal error";
}

/// Request identifier: an integer or a string
///
/// Numbers keep their `serde_json::Number` form so the response echoes the exact
/// textual representation the client sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric identifier
    Number(serde_json::Number),
    /// String identifier
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for RequestId {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

/// JSON-RPC 2.0 Request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,

    /// Method name to invoke
    pub method: String,

    /// Optional parameters for the method
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub params: Option<Value>,

    /// Request identifier; absent for notifications
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<RequestId>,
}

impl JsonRpcRequest {
    /// Create a new request with the given id
    #[must_use]
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            method: method.into(),
            params,
            id: Some(id.into()),
        }
    }

    /// Create a notification (no ID, no response expected)
    #[must_use]
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            method: method.into(),
            params,
            id: None,
        }
    }

    /// Whether the sender expects no response envelope
    ///
    /// True when the id is absent or the method is in the reserved
    /// `notifications/` namespace.
    #[must_use]
    pub fn is_notification(&self) -> bool {
        self.id.is_none() || self.method.starts_with(methods::NOTIFICATION_PREFIX)
    }
}

/// Result-or-error half of a response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    /// Successful outcome
    Result {
        /// Method result
        result: Value,
    },
    /// Protocol-level failure
    Error {
        /// Error object
        error: JsonRpcError,
    },
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,

    /// Result or error
    #[serde(flatten)]
    pub payload: ResponsePayload,

    /// Request identifier for correlation; `null` when the request id was unreadable
    pub id: Option<RequestId>,
}

/// JSON-RPC 2.0 Error Object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code from [`error_codes`]
    pub code: i32,

    /// Human-readable error message
    pub message: String,

    /// Additional error information
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response
    #[must_use]
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            payload: ResponsePayload::Result { result },
            id,
        }
    }

    /// Wrap an existing error object
    #[must_use]
    pub fn from_error(id: Option<RequestId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            payload: ResponsePayload::Error { error },
            id,
        }
    }

    /// Result payload, if this is a success response
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        match &self.payload {
            ResponsePayload::Result { result } => Some(result),
            ResponsePayload::Error { .. } => None,
        }
    }

    /// Error object, if this is an error response
    #[must_use]
    pub const fn error_object(&self) -> Option<&JsonRpcError> {
        match &self.payload {
            ResponsePayload::Error { error } => Some(error),
            ResponsePayload::Result { .. } => None,
        }
    }

    /// Check if this is an error response
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.payload, ResponsePayload::Error { .. })
    }
}

impl JsonRpcError {
    /// Create a new error
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create an error with data
    #[must_use]
    pub fn with_data(code: i32, message: impl Into<String>, data: Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// `-32601` for `method`
    #[must_use]
    pub fn method_not_found(method: &str) -> Self {
        Self::with_data(
            error_codes::METHOD_NOT_FOUND,
            error_messages::METHOD_NOT_FOUND,
            Value::String(method.to_owned()),
        )
    }

    /// `-32602` with a reason in `data`
    #[must_use]
    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::with_data(
            error_codes::INVALID_PARAMS,
            error_messages::INVALID_PARAMS,
            Value::String(reason.into()),
        )
    }

    /// `-32603` without internal detail
    #[must_use]
    pub fn internal() -> Self {
        Self::new(error_codes::INTERNAL_ERROR, error_messages::INTERNAL_ERROR)
    }
}
