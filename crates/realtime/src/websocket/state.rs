//! Global realtime state
//!
//! Owns the connection table and composes the presence registry with the
//! room registry. Everything here is fire-and-forget: expected conditions
//! like offline users or unknown relay targets are silent no-ops, never
//! errors back to the caller.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use skillswap_shared::{
    ChatMessage, ConnectionId, ConversationId, RoomId, ServerEvent, UserId,
};

use super::connection::Connection;
use super::presence::PresenceRegistry;
use super::room::RoomRegistry;

/// Global realtime state shared across all connections
#[derive(Clone)]
pub struct RealtimeState {
    /// All active connections indexed by connection_id
    pub connections: Arc<RwLock<HashMap<ConnectionId, Arc<Connection>>>>,

    /// User presence index for user-addressed fan-out
    pub presence: Arc<PresenceRegistry>,

    /// Meeting room membership for signaling
    pub rooms: Arc<RoomRegistry>,
}

impl RealtimeState {
    /// Create new realtime state
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
            presence: Arc::new(PresenceRegistry::new()),
            rooms: Arc::new(RoomRegistry::new()),
        }
    }

    /// Add a connection, registering presence when it is authenticated
    pub async fn add_connection(&self, conn: Connection) -> Arc<Connection> {
        let conn = Arc::new(conn);
        {
            let mut connections = self.connections.write().await;
            connections.insert(conn.connection_id, Arc::clone(&conn));

            tracing::info!(
                connection_id = %conn.connection_id,
                user = conn.user_id.as_ref().map(UserId::as_str).unwrap_or("anonymous"),
                total_connections = connections.len(),
                "WebSocket connection added"
            );
        }

        if let Some(user_id) = &conn.user_id {
            self.presence.register(user_id, Arc::clone(&conn)).await;
        }
        conn
    }

    /// Remove a connection and run its full disconnect cleanup
    ///
    /// The connection is swept out of every room (rooms that empty trigger a
    /// global `meeting-ended`) and out of the presence index. Safe to call
    /// for an unknown id.
    pub async fn remove_connection(&self, connection_id: ConnectionId) {
        let removed = {
            let mut connections = self.connections.write().await;
            let conn = connections.remove(&connection_id);
            if conn.is_some() {
                tracing::info!(
                    connection_id = %connection_id,
                    remaining_connections = connections.len(),
                    "WebSocket connection removed"
                );
            }
            conn
        };
        let Some(conn) = removed else {
            return;
        };

        let emptied = self.rooms.remove_connection(connection_id).await;
        for room_id in emptied {
            self.broadcast_all(ServerEvent::MeetingEnded {
                meeting_id: room_id,
            })
            .await;
        }

        if let Some(user_id) = &conn.user_id {
            self.presence.unregister(user_id, connection_id).await;
        }
    }

    /// Get a connection by id
    pub async fn get_connection(&self, connection_id: &ConnectionId) -> Option<Arc<Connection>> {
        let connections = self.connections.read().await;
        connections.get(connection_id).cloned()
    }

    /// Leave a room; if it emptied, tell every live connection the meeting ended
    ///
    /// The broadcast goes to all connections, not just former members:
    /// clients filter by `meetingId`.
    pub async fn leave_room(&self, room_id: &RoomId, connection_id: ConnectionId) {
        if self.rooms.leave(room_id, connection_id).await {
            self.broadcast_all(ServerEvent::MeetingEnded {
                meeting_id: room_id.clone(),
            })
            .await;
        }
    }

    /// Relay a session description offer to one connection
    ///
    /// Dropped without a reply when the target or description is missing,
    /// null, or names a connection that no longer exists.
    pub async fn relay_offer(
        &self,
        from: ConnectionId,
        target: Option<ConnectionId>,
        description: Value,
        room_id: Option<RoomId>,
    ) {
        let Some(target) = target else { return };
        if description.is_null() {
            return;
        }
        self.send_to(
            target,
            ServerEvent::Offer {
                from_connection_id: from,
                description,
                room_id,
            },
        )
        .await;
    }

    /// Relay a session description answer to one connection
    pub async fn relay_answer(
        &self,
        from: ConnectionId,
        target: Option<ConnectionId>,
        description: Value,
        room_id: Option<RoomId>,
    ) {
        let Some(target) = target else { return };
        if description.is_null() {
            return;
        }
        self.send_to(
            target,
            ServerEvent::Answer {
                from_connection_id: from,
                description,
                room_id,
            },
        )
        .await;
    }

    /// Relay an ICE candidate to one connection
    pub async fn relay_ice_candidate(
        &self,
        from: ConnectionId,
        target: Option<ConnectionId>,
        candidate: Value,
        room_id: Option<RoomId>,
    ) {
        let Some(target) = target else { return };
        if candidate.is_null() {
            return;
        }
        self.send_to(
            target,
            ServerEvent::IceCandidate {
                from_connection_id: from,
                candidate,
                room_id,
            },
        )
        .await;
    }

    /// Push a chat message to its receiver and echo it to the sender
    ///
    /// Requires an authenticated sending connection; the message itself was
    /// already persisted by the message service.
    pub async fn relay_chat_message(&self, from: &Connection, message: ChatMessage) {
        if !from.is_authenticated() {
            tracing::debug!(
                connection_id = %from.connection_id,
                "Dropping chat message from unauthenticated connection"
            );
            return;
        }

        self.presence
            .emit_to_user(
                &message.receiver,
                ServerEvent::NewMessage {
                    message: message.clone(),
                },
            )
            .await;
        let _ = from.send(ServerEvent::MessageSent { message });
    }

    /// Tell a conversation counterparty their messages were read
    pub async fn mark_conversation_read(
        &self,
        from: &Connection,
        conversation_id: ConversationId,
        peer_id: UserId,
    ) {
        let Some(reader) = from.user_id.clone() else {
            tracing::debug!(
                connection_id = %from.connection_id,
                "Dropping read receipt from unauthenticated connection"
            );
            return;
        };

        self.presence
            .emit_to_user(
                &peer_id,
                ServerEvent::ConversationRead {
                    conversation_id,
                    reader,
                },
            )
            .await;
    }

    /// Send an event to every live connection of a user
    ///
    /// Returns the number of connections the event was queued for.
    pub async fn notify_user(&self, user_id: &UserId, event: ServerEvent) -> usize {
        self.presence.emit_to_user(user_id, event).await
    }

    /// Broadcast an event to every live connection
    pub async fn broadcast_all(&self, event: ServerEvent) {
        let connections = self.connections.read().await;
        let mut delivered = 0;
        let mut failed = 0;
        for conn in connections.values() {
            match conn.send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => failed += 1,
            }
        }

        tracing::debug!(
            event_type = ?event,
            delivered = delivered,
            failed = failed,
            "Broadcast event to all connections"
        );
    }

    /// Send an event to one connection, ignoring unknown targets
    async fn send_to(&self, target: ConnectionId, event: ServerEvent) {
        match self.get_connection(&target).await {
            Some(conn) => {
                let _ = conn.send(event);
            }
            None => {
                tracing::debug!(connection_id = %target, "Relay target not connected");
            }
        }
    }

    /// Get total number of active connections
    pub async fn connection_count(&self) -> usize {
        let connections = self.connections.read().await;
        connections.len()
    }

    /// Get statistics about the realtime state
    pub async fn get_stats(&self) -> RealtimeStats {
        RealtimeStats {
            active_connections: self.connection_count().await,
            active_rooms: self.rooms.room_count().await,
            online_users: self.presence.online_user_count().await,
        }
    }
}

impl Default for RealtimeState {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the realtime state
#[derive(Debug, Clone)]
pub struct RealtimeStats {
    /// Number of active connections
    pub active_connections: usize,
    /// Number of active meeting rooms
    pub active_rooms: usize,
    /// Number of users with at least one live connection
    pub online_users: usize,
}
