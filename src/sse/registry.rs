// ABOUTME: Registry of open GET event streams keyed by connection id
// ABOUTME: Guard-based removal plus per-connection close signals for DELETE and shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, info};
use uuid::Uuid;

/// Metadata for one open stream
#[derive(Debug, Clone)]
pub struct ConnectionMetadata {
    /// Session the stream belongs to
    pub session_id: String,
    /// When the stream opened
    pub connected_at: DateTime<Utc>,
}

#[derive(Debug)]
struct ConnectionEntry {
    metadata: ConnectionMetadata,
    close: Arc<Notify>,
}

/// Live GET streams
///
/// Entries are removed by dropping the [`ConnectionGuard`] returned from
/// [`ConnectionRegistry::register`], whichever way the stream ends.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<Uuid, ConnectionEntry>,
}

impl ConnectionRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stream for `session_id`
    #[must_use]
    pub fn register(self: &Arc<Self>, session_id: &str) -> ConnectionGuard {
        let connection_id = Uuid::new_v4();
        let close = Arc::new(Notify::new());
        self.connections.insert(
            connection_id,
            ConnectionEntry {
                metadata: ConnectionMetadata {
                    session_id: session_id.to_owned(),
                    connected_at: Utc::now(),
                },
                close: Arc::clone(&close),
            },
        );

        info!(%connection_id, session_id, "SSE stream registered");
        ConnectionGuard {
            registry: Arc::clone(self),
            connection_id,
            close,
        }
    }

    /// Signal every stream belonging to `session_id` to end; returns how many were signalled
    pub fn close_session(&self, session_id: &str) -> usize {
        let mut closed = 0;
        for entry in &self.connections {
            if entry.metadata.session_id == session_id {
                entry.close.notify_one();
                closed += 1;
            }
        }
        if closed > 0 {
            debug!(session_id, closed, "closing SSE streams for session");
        }
        closed
    }

    /// Signal every stream to end
    pub fn close_all(&self) -> usize {
        let mut closed = 0;
        for entry in &self.connections {
            entry.close.notify_one();
            closed += 1;
        }
        closed
    }

    /// Metadata for a connection, if it is still open
    #[must_use]
    pub fn get(&self, connection_id: &Uuid) -> Option<ConnectionMetadata> {
        self.connections
            .get(connection_id)
            .map(|entry| entry.metadata.clone())
    }

    /// Number of open streams
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.connections.len()
    }

    fn unregister(&self, connection_id: &Uuid) {
        if let Some((_, entry)) = self.connections.remove(connection_id) {
            info!(
                %connection_id,
                session_id = %entry.metadata.session_id,
                "SSE stream unregistered"
            );
        }
    }
}

/// Registration handle owned by a stream; unregisters on drop
#[derive(Debug)]
pub struct ConnectionGuard {
    registry: Arc<ConnectionRegistry>,
    connection_id: Uuid,
    close: Arc<Notify>,
}

impl ConnectionGuard {
    /// Connection identifier
    #[must_use]
    pub const fn connection_id(&self) -> Uuid {
        self.connection_id
    }

    /// Resolves once the registry asks this stream to close
    pub async fn closed(&self) {
        self.close.notified().await;
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.registry.unregister(&self.connection_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_guard_drop_unregisters() {
        let registry = Arc::new(ConnectionRegistry::new());
        let first = registry.register("s1");
        let second = registry.register("s1");
        assert_eq!(registry.active_count(), 2);
        assert_eq!(registry.get(&first.connection_id()).unwrap().session_id, "s1");

        drop(first);
        assert_eq!(registry.active_count(), 1);
        drop(second);
        assert_eq!(registry.active_count(), 0);
    }

    #[tokio::test]
    async fn test_close_session_only_signals_matching_streams() {
        let registry = Arc::new(ConnectionRegistry::new());
        let target = registry.register("target");
        let other = registry.register("other");

        assert_eq!(registry.close_session("target"), 1);

        tokio::time::timeout(Duration::from_secs(1), target.closed())
            .await
            .unwrap();
        assert!(
            tokio::time::timeout(Duration::from_millis(50), other.closed())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_close_all() {
        let registry = Arc::new(ConnectionRegistry::new());
        let guards: Vec<_> = (0..3).map(|i| registry.register(&format!("s{i}"))).collect();

        assert_eq!(registry.close_all(), 3);
        for guard in &guards {
            tokio::time::timeout(Duration::from_secs(1), guard.closed())
                .await
                .unwrap();
        }
    }
}
