// ABOUTME: Tool-specific error types for the pluggable tool registry
// ABOUTME: Domain failures that the method router folds into isError results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Error Types
//!
//! A `ToolError` is a normal protocol outcome. The method router wraps it into a
//! `tools/call` result whose `isError` flag is set; it never becomes a JSON-RPC error.

/// Errors raised by a tool registry while executing a call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolError {
    /// Tool was not found in the registry
    #[error("unknown tool: {tool_name}")]
    UnknownTool {
        /// Name of the requested tool
        tool_name: String,
    },
    /// Divisor was zero
    #[error("division by zero is not allowed")]
    DivisionByZero,
    /// Operation produced NaN or an infinity
    #[error("invalid operation")]
    NonFiniteResult,
    /// Required argument absent from the call
    #[error("missing required argument '{parameter}'")]
    MissingArgument {
        /// Name of the missing argument
        parameter: String,
    },
    /// Argument present but unusable by the tool
    #[error("invalid argument '{parameter}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument
        parameter: String,
        /// Reason the argument is invalid
        reason: String,
    },
}

impl ToolError {
    /// Create an "unknown tool" error
    #[must_use]
    pub fn unknown_tool(tool_name: impl Into<String>) -> Self {
        Self::UnknownTool {
            tool_name: tool_name.into(),
        }
    }

    /// Create a "missing argument" error
    #[must_use]
    pub fn missing_argument(parameter: impl Into<String>) -> Self {
        Self::MissingArgument {
            parameter: parameter.into(),
        }
    }

    /// Create an "invalid argument" error
    #[must_use]
    pub fn invalid_argument(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_messages() {
        assert_eq!(
            ToolError::DivisionByZero.to_string(),
            "division by zero is not allowed"
        );
        assert_eq!(ToolError::unknown_tool("modulo").to_string(), "unknown tool: modulo");
        assert_eq!(
            ToolError::invalid_argument("a", "expected a number").to_string(),
            "invalid argument 'a': expected a number"
        );
    }
}
