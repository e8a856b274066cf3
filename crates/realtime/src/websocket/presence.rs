//! User presence registry
//!
//! Maps each authenticated user to the set of live connections they hold, so
//! user-addressed events reach every open tab. A user key exists only while
//! at least one connection is registered under it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use skillswap_shared::{ConnectionId, ServerEvent, UserId};

use super::connection::Connection;

/// Tracks which connections belong to which user
pub struct PresenceRegistry {
    /// Map of user_id -> live connections of that user
    users: Arc<RwLock<HashMap<UserId, Vec<Arc<Connection>>>>>,
}

impl PresenceRegistry {
    /// Create a new presence registry
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Record a connection under a user
    ///
    /// Registering the same connection twice is a no-op.
    pub async fn register(&self, user_id: &UserId, conn: Arc<Connection>) {
        let mut users = self.users.write().await;
        let conns = users.entry(user_id.clone()).or_default();
        if !conns
            .iter()
            .any(|c| c.connection_id == conn.connection_id)
        {
            conns.push(Arc::clone(&conn));
        }

        tracing::debug!(
            user_id = %user_id,
            connection_id = %conn.connection_id,
            session_count = conns.len(),
            "Connection registered for user"
        );
    }

    /// Remove one connection from a user's set
    ///
    /// The user key is dropped entirely when its last connection goes.
    pub async fn unregister(&self, user_id: &UserId, connection_id: ConnectionId) {
        let mut users = self.users.write().await;
        if let Some(conns) = users.get_mut(user_id) {
            conns.retain(|c| c.connection_id != connection_id);

            if conns.is_empty() {
                users.remove(user_id);
                tracing::debug!(user_id = %user_id, "User has no remaining connections");
            } else {
                tracing::debug!(
                    user_id = %user_id,
                    connection_id = %connection_id,
                    session_count = conns.len(),
                    "Connection unregistered for user"
                );
            }
        }
    }

    /// Send an event to every live connection of a user
    ///
    /// Fire-and-forget: returns how many connections the event was queued
    /// for, which is 0 when the user is offline. Never an error.
    pub async fn emit_to_user(&self, user_id: &UserId, event: ServerEvent) -> usize {
        let users = self.users.read().await;
        let Some(conns) = users.get(user_id) else {
            tracing::debug!(user_id = %user_id, "No live connections for user");
            return 0;
        };

        let mut delivered = 0;
        let mut failed = 0;
        for conn in conns {
            match conn.send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    failed += 1;
                    tracing::warn!(
                        connection_id = %conn.connection_id,
                        "Failed to send event to connection (likely closed)"
                    );
                }
            }
        }

        tracing::debug!(
            user_id = %user_id,
            delivered = delivered,
            failed = failed,
            "Emitted event to user connections"
        );
        delivered
    }

    /// Number of live connections registered for a user
    pub async fn session_count(&self, user_id: &UserId) -> usize {
        let users = self.users.read().await;
        users.get(user_id).map(|v| v.len()).unwrap_or(0)
    }

    /// Number of users with at least one live connection
    pub async fn online_user_count(&self) -> usize {
        let users = self.users.read().await;
        users.len()
    }
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
