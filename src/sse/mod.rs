// ABOUTME: Server-Sent Events framing and streaming for the MCP HTTP transport
// ABOUTME: Frame encoding, open-stream registry, and the GET heartbeat stream
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// SSE frame encoding
pub mod event;
/// Open-stream bookkeeping
pub mod registry;
/// GET heartbeat stream
pub mod stream;

pub use event::SseEvent;
pub use registry::{ConnectionGuard, ConnectionMetadata, ConnectionRegistry};
pub use stream::heartbeat_stream;
