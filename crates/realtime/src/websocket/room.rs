//! Meeting room membership
//!
//! Tracks which connections occupy which meeting rooms and fires the
//! membership notifications: a `room-users` snapshot to each joiner,
//! `user-joined` / `user-left` to the members already there. A room entry
//! exists only while it has at least one member; callers broadcast
//! `meeting-ended` when told a room emptied.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use skillswap_shared::{ConnectionId, RoomId, ServerEvent};

use super::connection::Connection;

/// Room membership index for WebRTC signaling
pub struct RoomRegistry {
    /// Map of room_id -> member connections
    rooms: Arc<RwLock<HashMap<RoomId, Vec<Arc<Connection>>>>>,
}

impl RoomRegistry {
    /// Create a new room registry
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Add a connection to a room
    ///
    /// The joiner receives a `room-users` snapshot of the other members;
    /// everyone already present receives `user-joined`. New members initiate
    /// the WebRTC offers, so the snapshot is exactly the joiner's list of
    /// offer targets. Joining a room twice leaves the member set unchanged
    /// but re-fires both notifications.
    pub async fn join(&self, room_id: &RoomId, conn: &Arc<Connection>) {
        let mut rooms = self.rooms.write().await;
        let members = rooms.entry(room_id.clone()).or_default();
        if !members
            .iter()
            .any(|c| c.connection_id == conn.connection_id)
        {
            members.push(Arc::clone(conn));
        }

        let peers: Vec<ConnectionId> = members
            .iter()
            .filter(|c| c.connection_id != conn.connection_id)
            .map(|c| c.connection_id)
            .collect();

        let _ = conn.send(ServerEvent::RoomUsers {
            room_id: room_id.clone(),
            peers,
        });
        for member in members
            .iter()
            .filter(|c| c.connection_id != conn.connection_id)
        {
            let _ = member.send(ServerEvent::UserJoined {
                room_id: room_id.clone(),
                connection_id: conn.connection_id,
            });
        }

        tracing::debug!(
            room_id = %room_id,
            connection_id = %conn.connection_id,
            room_size = members.len(),
            "Connection joined room"
        );
    }

    /// Remove a connection from a room
    ///
    /// Remaining members receive `user-left`. Returns true when the room
    /// emptied and was deleted; leaving a room one never joined (or an
    /// unknown room) changes nothing and notifies nobody.
    pub async fn leave(&self, room_id: &RoomId, connection_id: ConnectionId) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(members) = rooms.get_mut(room_id) else {
            return false;
        };

        let before = members.len();
        members.retain(|c| c.connection_id != connection_id);
        if members.len() == before {
            return false;
        }

        for member in members.iter() {
            let _ = member.send(ServerEvent::UserLeft {
                room_id: room_id.clone(),
                connection_id,
            });
        }

        if members.is_empty() {
            rooms.remove(room_id);
            tracing::debug!(room_id = %room_id, "Removed empty room");
            return true;
        }

        tracing::debug!(
            room_id = %room_id,
            connection_id = %connection_id,
            room_size = members.len(),
            "Connection left room"
        );
        false
    }

    /// Forward a display-name announcement to the other room members
    pub async fn broadcast_peer_info(&self, room_id: &RoomId, from: ConnectionId, user_name: &str) {
        let rooms = self.rooms.read().await;
        let Some(members) = rooms.get(room_id) else {
            return;
        };

        let mut delivered = 0;
        for member in members.iter().filter(|c| c.connection_id != from) {
            if member
                .send(ServerEvent::PeerInfo {
                    connection_id: from,
                    user_name: user_name.to_string(),
                })
                .is_ok()
            {
                delivered += 1;
            }
        }

        tracing::debug!(
            room_id = %room_id,
            connection_id = %from,
            recipients = delivered,
            "Broadcast peer info to room"
        );
    }

    /// Remove a connection from every room it occupies
    ///
    /// Each affected room gets the same treatment as an explicit leave.
    /// Returns the rooms that emptied, in no particular order.
    pub async fn remove_connection(&self, connection_id: ConnectionId) -> Vec<RoomId> {
        let mut rooms = self.rooms.write().await;
        let mut emptied = Vec::new();
        let mut left = 0;

        for (room_id, members) in rooms.iter_mut() {
            let before = members.len();
            members.retain(|c| c.connection_id != connection_id);
            if members.len() == before {
                continue;
            }
            left += 1;

            for member in members.iter() {
                let _ = member.send(ServerEvent::UserLeft {
                    room_id: room_id.clone(),
                    connection_id,
                });
            }
            if members.is_empty() {
                emptied.push(room_id.clone());
            }
        }

        rooms.retain(|_, members| !members.is_empty());

        if left > 0 {
            tracing::debug!(
                connection_id = %connection_id,
                room_count = left,
                emptied = emptied.len(),
                "Removed connection from rooms"
            );
        }
        emptied
    }

    /// Room size (number of member connections)
    pub async fn room_size(&self, room_id: &RoomId) -> usize {
        let rooms = self.rooms.read().await;
        rooms.get(room_id).map(|v| v.len()).unwrap_or(0)
    }

    /// Total number of active rooms
    pub async fn room_count(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
