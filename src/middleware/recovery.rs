// ABOUTME: Panic recovery for HTTP handlers
// ABOUTME: Converts a handler panic into a generic 500 response and logs the payload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::response::{IntoResponse, Response};
use calculator_mcp_core::errors::AppError;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

/// Best-effort text of a panic payload
#[must_use]
pub fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Response for a request whose handler panicked
///
/// The body never carries the panic message.
#[allow(clippy::needless_pass_by_value)]
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    error!(reason = panic_message(&*panic), "request handler panicked");
    AppError::internal().into_response()
}

/// Layer catching panics from every inner service
#[must_use]
pub fn recovery_layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(handle_panic as fn(Box<dyn Any + Send + 'static>) -> Response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_panic_message_variants() {
        let literal: Box<dyn Any + Send> = Box::new("static text");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned text"));
        let other: Box<dyn Any + Send> = Box::new(42_u8);

        assert_eq!(panic_message(&*literal), "static text");
        assert_eq!(panic_message(&*owned), "owned text");
        assert_eq!(panic_message(&*other), "unknown panic");
    }

    #[test]
    fn test_panic_becomes_generic_500() {
        let response = handle_panic(Box::new("secret detail"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
