// ABOUTME: Transport-level error codes and the AppError type with HTTP status mapping
// ABOUTME: Renders rejections as JSON error bodies for axum handlers and middleware
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard error codes for transport-level rejections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request could not be read or is otherwise unusable
    #[serde(rename = "BAD_REQUEST")]
    BadRequest = 1000,
    /// Non-initialize request carried no session header
    #[serde(rename = "SESSION_REQUIRED")]
    SessionRequired = 1001,
    /// Session header names no live session
    #[serde(rename = "SESSION_NOT_FOUND")]
    SessionNotFound = 1002,
    /// Accept header does not permit an event-stream response
    #[serde(rename = "NOT_ACCEPTABLE")]
    NotAcceptable = 1003,
    /// Body exceeds the configured ceiling
    #[serde(rename = "PAYLOAD_TOO_LARGE")]
    PayloadTooLarge = 1004,
    /// Content-Type is not JSON
    #[serde(rename = "UNSUPPORTED_MEDIA_TYPE")]
    UnsupportedMediaType = 1005,

    // Rate Limiting (2000-2999)
    /// Per-address request ceiling reached for the current window
    #[serde(rename = "RATE_LIMIT_EXCEEDED")]
    RateLimitExceeded = 2000,

    // Deadlines (3000-3999)
    /// Non-streaming request exceeded its deadline
    #[serde(rename = "REQUEST_TIMEOUT")]
    RequestTimeout = 3000,

    // Configuration (6000-6999)
    /// Configuration value rejected at startup
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6000,

    // Internal Errors (9000-9999)
    /// Unexpected server fault
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::BadRequest | Self::SessionRequired => 400,
            Self::SessionNotFound => 404,
            Self::NotAcceptable => 406,
            Self::PayloadTooLarge => 413,
            Self::UnsupportedMediaType => 415,
            Self::RateLimitExceeded => 429,
            Self::RequestTimeout => 504,
            Self::InternalError | Self::ConfigInvalid => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::BadRequest => "The request could not be processed",
            Self::SessionRequired => "A session identifier is required for this request",
            Self::SessionNotFound => "The session is invalid or has expired",
            Self::NotAcceptable => "The Accept header must permit text/event-stream",
            Self::PayloadTooLarge => "The request body exceeds the size limit",
            Self::UnsupportedMediaType => "The request body must be application/json",
            Self::RateLimitExceeded => "Too many requests from this address",
            Self::RequestTimeout => "The request did not complete in time",
            Self::ConfigInvalid => "The server configuration is invalid",
            Self::InternalError => "An internal server error occurred",
        }
    }
}

/// Unified transport error type
#[derive(Debug, Clone, thiserror::Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Correlation id copied from `x-request-id`, when known
    pub request_id: Option<String>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            request_id: None,
        }
    }

    /// Add a request ID to the error
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Missing session header on a non-initialize request
    #[must_use]
    pub fn session_required() -> Self {
        Self::new(ErrorCode::SessionRequired, "Session ID required")
    }

    /// Unknown or terminated session
    #[must_use]
    pub fn session_not_found() -> Self {
        Self::new(ErrorCode::SessionNotFound, "Invalid or expired session")
    }

    /// Accept header rejected by content negotiation
    #[must_use]
    pub fn not_acceptable() -> Self {
        Self::new(
            ErrorCode::NotAcceptable,
            "Accept header must include text/event-stream",
        )
    }

    /// Body larger than `limit` bytes
    #[must_use]
    pub fn payload_too_large(limit: usize) -> Self {
        Self::new(
            ErrorCode::PayloadTooLarge,
            format!("Request body exceeds {limit} bytes"),
        )
    }

    /// Content-Type other than JSON
    #[must_use]
    pub fn unsupported_media_type() -> Self {
        Self::new(
            ErrorCode::UnsupportedMediaType,
            "Content-Type must be application/json",
        )
    }

    /// Rate limit hit; `limit` requests per `window_secs`
    #[must_use]
    pub fn rate_limit_exceeded(limit: u32, window_secs: u64) -> Self {
        Self::new(
            ErrorCode::RateLimitExceeded,
            format!("Rate limit exceeded: {limit} requests per {window_secs}s"),
        )
    }

    /// Deadline elapsed before the handler produced a response
    #[must_use]
    pub fn request_timeout() -> Self {
        Self::new(ErrorCode::RequestTimeout, "Request timeout")
    }

    /// Invalid request that is not covered by a more specific code
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Generic internal failure; never carries internal detail
    #[must_use]
    pub fn internal() -> Self {
        Self::new(ErrorCode::InternalError, "Internal server error")
    }

    /// Configuration rejected at startup
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Correlation id
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub request_id: Option<String>,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                request_id: error.request_id,
            },
        }
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(ErrorResponse::from(self))).into_response()
    }
}
