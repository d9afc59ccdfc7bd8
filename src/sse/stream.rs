// ABOUTME: Heartbeat event stream backing the MCP GET endpoint
// ABOUTME: Emits a connected event then periodic heartbeats until closed, with panic isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::event::SseEvent;
use super::registry::ConnectionGuard;
use crate::constants::events;
use crate::middleware::recovery::panic_message;
use bytes::Bytes;
use chrono::Utc;
use futures_util::{FutureExt, Stream, StreamExt};
use serde::Serialize;
use std::convert::Infallible;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, warn};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConnectedEvent<'a> {
    connection_id: String,
    session_id: &'a str,
    timestamp: String,
}

#[derive(Serialize)]
struct HeartbeatEvent {
    timestamp: String,
}

enum Wake {
    Tick,
    Closed,
}

fn frame<T: Serialize>(event: &str, payload: &T) -> Option<Bytes> {
    match SseEvent::json(event, payload) {
        Ok(sse) => Some(sse.to_bytes()),
        Err(e) => {
            warn!(event, "failed to serialize SSE event: {e}");
            None
        }
    }
}

/// Event stream for one GET connection
///
/// Yields a `connected` event immediately, then a `heartbeat` every `interval`.
/// Ends when the registry signals close; dropping the stream drops `guard`,
/// which removes the connection from the registry. A panic inside the stream
/// ends only this stream.
pub fn heartbeat_stream(
    guard: ConnectionGuard,
    session_id: String,
    interval: Duration,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    let events = async_stream::stream! {
        let connection_id = guard.connection_id();
        let connected = ConnectedEvent {
            connection_id: connection_id.to_string(),
            session_id: &session_id,
            timestamp: Utc::now().to_rfc3339(),
        };
        if let Some(bytes) = frame(events::CONNECTED, &connected) {
            yield bytes;
        }

        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let wake = tokio::select! {
                () = guard.closed() => Wake::Closed,
                _ = ticker.tick() => Wake::Tick,
            };
            match wake {
                Wake::Closed => {
                    debug!(%connection_id, "SSE stream closed by server");
                    break;
                }
                Wake::Tick => {
                    let heartbeat = HeartbeatEvent {
                        timestamp: Utc::now().to_rfc3339(),
                    };
                    if let Some(bytes) = frame(events::HEARTBEAT, &heartbeat) {
                        yield bytes;
                    }
                }
            }
        }
    };

    isolate_panics(events)
}

/// End the stream instead of unwinding into the connection task when `inner` panics
fn isolate_panics<S>(inner: S) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static
where
    S: Stream<Item = Bytes> + Send + 'static,
{
    let mut inner = Box::pin(inner);
    async_stream::stream! {
        loop {
            match AssertUnwindSafe(inner.next()).catch_unwind().await {
                Ok(Some(bytes)) => yield Ok(bytes),
                Ok(None) => break,
                Err(panic) => {
                    error!(reason = panic_message(&*panic), "SSE stream panicked; closing stream");
                    break;
                }
            }
        }
    }
}
