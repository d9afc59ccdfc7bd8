// ABOUTME: Request deadline middleware with a first-writer-wins response gate
// ABOUTME: Streaming requests are exempt; a timeout never races the handler's own response
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Deadline Enforcement
//!
//! The handler runs in its own task. Both the handler's completion and the timer
//! must claim a [`ResponseGate`] before their response may be returned; exactly one
//! claim succeeds. A timed-out handler task is aborted before it has produced any
//! bytes, so the connection itself is never touched mid-write.

use crate::constants::content_types;
use crate::mcp::resources::ServerResources;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use calculator_mcp_core::errors::AppError;
use http::header::ACCEPT;
use http::HeaderMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::{AbortHandle, JoinError};
use tracing::{error, warn, Instrument};

/// Single-use "has a response been chosen" flag
#[derive(Debug, Default)]
pub struct ResponseGate {
    claimed: Mutex<bool>,
}

impl ResponseGate {
    /// Unclaimed gate
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the right to respond; `true` for exactly one caller
    pub fn claim(&self) -> bool {
        let mut claimed = match self.claimed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *claimed {
            false
        } else {
            *claimed = true;
            true
        }
    }

    /// Whether a response has been chosen
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        match self.claimed.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Whether the client asked for an event stream
#[must_use]
pub fn accepts_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains(content_types::EVENT_STREAM))
}

/// Aborts the handler task when the middleware future is dropped
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn join_failure(e: JoinError) -> Response {
    if e.is_panic() {
        // Hand the panic to the recovery layer
        std::panic::resume_unwind(e.into_panic());
    }
    error!("request task cancelled: {e}");
    AppError::internal().into_response()
}

/// Run `next` under `timeout`, answering 504 if the timer wins the gate
pub async fn run_with_deadline(request: Request, next: Next, timeout: Duration) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let gate = Arc::new(ResponseGate::new());
    let handler_gate = Arc::clone(&gate);
    let mut handler = tokio::spawn(
        async move {
            let response = next.run(request).await;
            handler_gate.claim().then_some(response)
        }
        .in_current_span(),
    );
    let _abort_on_drop = AbortOnDrop(handler.abort_handle());

    tokio::select! {
        joined = &mut handler => match joined {
            Ok(Some(response)) => response,
            Ok(None) => AppError::request_timeout().into_response(),
            Err(e) => join_failure(e),
        },
        () = tokio::time::sleep(timeout) => {
            if gate.claim() {
                handler.abort();
                warn!(%method, %path, timeout_secs = timeout.as_secs_f64(), "request timeout");
                AppError::request_timeout().into_response()
            } else {
                // The handler claimed first; its response is already on its way
                match handler.await {
                    Ok(Some(response)) => response,
                    Ok(None) => AppError::request_timeout().into_response(),
                    Err(e) => join_failure(e),
                }
            }
        }
    }
}

/// Enforce the configured deadline on non-streaming requests
pub async fn deadline_middleware(
    State(resources): State<Arc<ServerResources>>,
    request: Request,
    next: Next,
) -> Response {
    if accepts_event_stream(request.headers()) {
        return next.run(request).await;
    }
    run_with_deadline(request, next, resources.config.request_timeout()).await
}
