// ABOUTME: In-memory MCP session store keyed by unguessable hex identifiers
// ABOUTME: Concurrent create, lookup, delete, and expiry sweep behind a single RwLock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Store
//!
//! Sessions are created by `initialize`, referenced by every later request through
//! the `mcp-session-id` header, and destroyed by `DELETE` or the expiry sweep.
//! Nothing is persisted.

use chrono::{DateTime, Utc};
use rand::{rngs::OsRng, RngCore};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

/// Bytes of entropy in a session identifier
pub const SESSION_ID_BYTES: usize = 16;

/// Length of the hex-encoded identifier
pub const SESSION_ID_LEN: usize = SESSION_ID_BYTES * 2;

/// Metadata for one live session
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque identifier
    pub id: String,
    /// Wall-clock creation time
    pub created_at: DateTime<Utc>,
    created: Instant,
}

impl Session {
    fn new(id: String) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            created: Instant::now(),
        }
    }

    /// Time since creation
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created.elapsed()
    }
}

/// 128 bits from the OS CSPRNG, lower-case hex
#[must_use]
pub fn generate_session_id() -> String {
    let mut bytes = [0_u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Concurrent session table
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session and return its identifier
    pub async fn create(&self) -> String {
        let mut sessions = self.sessions.write().await;
        let id = loop {
            let candidate = generate_session_id();
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        sessions.insert(id.clone(), Session::new(id.clone()));
        drop(sessions);

        info!(session_id = %id, "created new MCP session");
        id
    }

    /// Look up a session
    pub async fn get(&self, id: &str) -> Option<Session> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Whether `id` names a live session
    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    /// Remove a session; `false` when it did not exist
    pub async fn delete(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!(session_id = %id, "deleted MCP session");
        }
        removed
    }

    /// Remove every session older than `ttl`, returning the removed identifiers
    pub async fn purge_expired(&self, ttl: Duration) -> Vec<String> {
        let mut sessions = self.sessions.write().await;
        let expired: Vec<String> = sessions
            .values()
            .filter(|session| session.age() >= ttl)
            .map(|session| session.id.clone())
            .collect();
        for id in &expired {
            sessions.remove(id);
        }
        drop(sessions);

        if !expired.is_empty() {
            debug!(count = expired.len(), "expired MCP sessions purged");
        }
        expired
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop every session, returning how many were live
    pub async fn clear(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let dropped = sessions.len();
        sessions.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_session_id_shape() {
        let id = generate_session_id();
        assert_eq!(id.len(), SESSION_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(id, generate_session_id());
    }

    #[tokio::test]
    async fn test_create_get_delete() {
        let store = SessionStore::new();
        let id = store.create().await;

        let session = store.get(&id).await.unwrap();
        assert_eq!(session.id, id);
        assert!(store.contains(&id).await);

        assert!(store.delete(&id).await);
        assert!(!store.delete(&id).await);
        assert!(store.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_mixed_operations() {
        let store = Arc::new(SessionStore::new());
        let mut handles = Vec::new();

        for i in 0..64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let id = store.create().await;
                assert!(store.contains(&id).await);
                if i % 2 == 0 {
                    assert!(store.delete(&id).await);
                    None
                } else {
                    Some(id)
                }
            }));
        }

        let mut survivors = HashSet::new();
        for handle in handles {
            if let Some(id) = handle.await.unwrap() {
                survivors.insert(id);
            }
        }

        assert_eq!(survivors.len(), 32);
        assert_eq!(store.len().await, 32);
        for id in &survivors {
            assert!(store.get(id).await.is_some());
        }
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = SessionStore::new();
        let id = store.create().await;

        assert!(store.purge_expired(Duration::from_secs(3600)).await.is_empty());
        assert_eq!(store.purge_expired(Duration::ZERO).await, vec![id]);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear_reports_dropped_sessions() {
        let store = SessionStore::new();
        let id = store.create().await;
        store.create().await;

        assert_eq!(store.clear().await, 2);
        assert!(!store.contains(&id).await);
        assert_eq!(store.clear().await, 0);
    }
}
