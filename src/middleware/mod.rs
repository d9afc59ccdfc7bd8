// ABOUTME: HTTP middleware for request correlation, logging, protection, and throttling
// ABOUTME: Each interceptor is an axum from_fn middleware over the shared server resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod access_log;
pub mod cors;
pub mod deadline;
pub mod rate_limiting;
pub mod recovery;
pub mod request_id;
pub mod security_headers;
pub mod validation;

// Request correlation and access logging
pub use access_log::access_log_middleware;
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};

// Fault isolation
pub use recovery::{handle_panic, recovery_layer};

// Response hardening
pub use cors::setup_cors;
pub use security_headers::security_headers_middleware;

// Request shape and rate limiting
pub use rate_limiting::{
    create_rate_limit_error, create_rate_limit_headers, headers, rate_limit_middleware,
};
pub use validation::validation_middleware;

// Deadline enforcement
pub use deadline::{deadline_middleware, ResponseGate};
