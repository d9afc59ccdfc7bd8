// ABOUTME: JSON-RPC wire codec turning request bytes into envelopes and responses into bytes
// ABOUTME: Classifies malformed input as parse errors and misshapen envelopes as invalid requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Decoding runs in two stages. Bytes that are not JSON fail with `-32700` before
//! anything else is inspected. JSON that is not a well-formed 2.0 request object fails
//! with `-32600`, echoing the request id when one can be recovered.

use super::{
    error_codes, error_messages, JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId,
};
use crate::constants::JSONRPC_VERSION;
use serde_json::{Map, Value};

/// Failure to turn request bytes into a [`JsonRpcRequest`]
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Body is not valid JSON
    #[error("parse error: {0}")]
    Parse(#[source] serde_json::Error),
    /// Body is JSON but not a valid request envelope
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Identifier recovered from the envelope, if any
        id: Option<RequestId>,
        /// What was wrong with the envelope
        reason: String,
    },
}

impl DecodeError {
    fn invalid(id: Option<RequestId>, reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            id,
            reason: reason.into(),
        }
    }

    /// JSON-RPC error code for this failure
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Parse(_) => error_codes::PARSE_ERROR,
            Self::InvalidRequest { .. } => error_codes::INVALID_REQUEST,
        }
    }

    /// Identifier to echo in the error response
    #[must_use]
    pub const fn id(&self) -> Option<&RequestId> {
        match self {
            Self::Parse(_) => None,
            Self::InvalidRequest { id, .. } => id.as_ref(),
        }
    }

    /// Error envelope describing this failure
    #[must_use]
    pub fn to_response(&self) -> JsonRpcResponse {
        let (message, detail) = match self {
            Self::Parse(e) => (error_messages::PARSE_ERROR, e.to_string()),
            Self::InvalidRequest { reason, .. } => (error_messages::INVALID_REQUEST, reason.clone()),
        };
        JsonRpcResponse::from_error(
            self.id().cloned(),
            JsonRpcError::with_data(self.code(), message, Value::String(detail)),
        )
    }
}

/// Decode one request envelope
///
/// # Errors
///
/// Returns [`DecodeError::Parse`] for bytes that are not JSON and
/// [`DecodeError::InvalidRequest`] for JSON that is not a JSON-RPC 2.0 request.
pub fn decode(bytes: &[u8]) -> Result<JsonRpcRequest, DecodeError> {
    let value: Value = serde_json::from_slice(bytes).map_err(DecodeError::Parse)?;

    let Value::Object(mut envelope) = value else {
        return Err(DecodeError::invalid(
            None,
            "request must be a single JSON object",
        ));
    };

    let id = take_id(&mut envelope)?;

    match envelope.get("jsonrpc") {
        Some(Value::String(version)) if version == JSONRPC_VERSION => {}
        Some(_) => {
            return Err(DecodeError::invalid(
                id,
                format!("jsonrpc must be \"{JSONRPC_VERSION}\""),
            ))
        }
        None => return Err(DecodeError::invalid(id, "missing jsonrpc version")),
    }

    let method = match envelope.remove("method") {
        Some(Value::String(method)) if !method.is_empty() => method,
        Some(_) => return Err(DecodeError::invalid(id, "method must be a non-empty string")),
        None => return Err(DecodeError::invalid(id, "missing method")),
    };

    let params = match envelope.remove("params") {
        None | Some(Value::Null) => None,
        Some(params @ (Value::Object(_) | Value::Array(_))) => Some(params),
        Some(_) => {
            return Err(DecodeError::invalid(
                id,
                "params must be an object or an array",
            ))
        }
    };

    Ok(JsonRpcRequest {
        jsonrpc: JSONRPC_VERSION.to_owned(),
        method,
        params,
        id,
    })
}

fn take_id(envelope: &mut Map<String, Value>) -> Result<Option<RequestId>, DecodeError> {
    match envelope.remove("id") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(RequestId::Number(n))),
        Some(Value::String(s)) => Ok(Some(RequestId::String(s))),
        Some(_) => Err(DecodeError::invalid(None, "id must be a number or a string")),
    }
}

/// Serialize a response envelope
///
/// # Errors
///
/// Returns an error if the result payload cannot be serialized
pub fn encode(response: &JsonRpcResponse) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(response)
}

/// Serialize a success envelope for `id`
///
/// # Errors
///
/// Returns an error if `payload` cannot be serialized
pub fn encode_result(id: Option<RequestId>, payload: Value) -> Result<Vec<u8>, serde_json::Error> {
    encode(&JsonRpcResponse::success(id, payload))
}

/// Serialize an error envelope for `id`
///
/// # Errors
///
/// Returns an error if `detail` cannot be serialized
pub fn encode_error(
    id: Option<RequestId>,
    code: i32,
    message: &str,
    detail: Option<Value>,
) -> Result<Vec<u8>, serde_json::Error> {
    let error = match detail {
        Some(data) => JsonRpcError::with_data(code, message, data),
        None => JsonRpcError::new(code, message),
    };
    encode(&JsonRpcResponse::from_error(id, error))
}
