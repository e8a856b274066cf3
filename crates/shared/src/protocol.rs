//! Realtime wire protocol
//!
//! Defines all client-to-server and server-to-client event types with
//! type-safe serde serialization. Events are tagged by a `type` field with
//! kebab-case names; payload keys are camelCase.
//!
//! WebRTC session descriptions and ICE candidates are carried as opaque JSON:
//! the relay forwards them verbatim and never inspects their shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::types::{ConnectionId, ConversationId, MessageKind, RoomId, UserId};

// =============================================================================
// Client-to-Server Events
// =============================================================================

/// Events sent from client to server
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Enter a meeting room
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: RoomId },

    /// Leave a meeting room
    #[serde(rename_all = "camelCase")]
    LeaveRoom { room_id: RoomId },

    /// Announce a display name to the other room members
    #[serde(rename_all = "camelCase")]
    UserInfo { room_id: RoomId, user_name: String },

    /// Forward a session description offer to one peer
    #[serde(rename_all = "camelCase")]
    Offer {
        #[serde(default)]
        target_connection_id: Option<ConnectionId>,
        #[serde(default)]
        description: Value,
        #[serde(default)]
        room_id: Option<RoomId>,
    },

    /// Forward a session description answer to one peer
    #[serde(rename_all = "camelCase")]
    Answer {
        #[serde(default)]
        target_connection_id: Option<ConnectionId>,
        #[serde(default)]
        description: Value,
        #[serde(default)]
        room_id: Option<RoomId>,
    },

    /// Forward an ICE candidate to one peer
    #[serde(rename_all = "camelCase")]
    IceCandidate {
        #[serde(default)]
        target_connection_id: Option<ConnectionId>,
        #[serde(default)]
        candidate: Value,
        #[serde(default)]
        room_id: Option<RoomId>,
    },

    /// Push an already-persisted chat message to its receiver
    #[serde(rename_all = "camelCase")]
    SendMessage { message: ChatMessage },

    /// Tell the conversation counterparty their messages were read
    #[serde(rename_all = "camelCase")]
    OpenConversation {
        conversation_id: ConversationId,
        peer_id: UserId,
    },
}

// =============================================================================
// Server-to-Client Events
// =============================================================================

/// Events sent from server to client
#[derive(Debug, Serialize, Clone)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Connection acknowledged; carries the server-assigned connection id
    #[serde(rename_all = "camelCase")]
    Connected { connection_id: ConnectionId },

    /// Current members of a room, sent to a joiner (the joiner excluded)
    #[serde(rename_all = "camelCase")]
    RoomUsers {
        room_id: RoomId,
        peers: Vec<ConnectionId>,
    },

    /// A new member entered the room
    #[serde(rename_all = "camelCase")]
    UserJoined {
        room_id: RoomId,
        connection_id: ConnectionId,
    },

    /// A member left the room
    #[serde(rename_all = "camelCase")]
    UserLeft {
        room_id: RoomId,
        connection_id: ConnectionId,
    },

    /// Display name announced by another room member
    #[serde(rename_all = "camelCase")]
    PeerInfo {
        connection_id: ConnectionId,
        user_name: String,
    },

    /// Session description offer relayed from a peer
    #[serde(rename_all = "camelCase")]
    Offer {
        from_connection_id: ConnectionId,
        description: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        room_id: Option<RoomId>,
    },

    /// Session description answer relayed from a peer
    #[serde(rename_all = "camelCase")]
    Answer {
        from_connection_id: ConnectionId,
        description: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        room_id: Option<RoomId>,
    },

    /// ICE candidate relayed from a peer
    #[serde(rename_all = "camelCase")]
    IceCandidate {
        from_connection_id: ConnectionId,
        candidate: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        room_id: Option<RoomId>,
    },

    /// A meeting invitation was issued to this user
    #[serde(rename_all = "camelCase")]
    MeetingStarted {
        meeting_id: RoomId,
        inviter_id: UserId,
        inviter_name: String,
        title: String,
        #[serde(with = "time::serde::rfc3339")]
        created_at: OffsetDateTime,
    },

    /// The meeting's room has emptied out
    #[serde(rename_all = "camelCase")]
    MeetingEnded { meeting_id: RoomId },

    /// Incoming chat message for the receiving user
    #[serde(rename_all = "camelCase")]
    NewMessage { message: ChatMessage },

    /// Echo of a chat message back to the sending connection
    #[serde(rename_all = "camelCase")]
    MessageSent { message: ChatMessage },

    /// The counterparty opened the conversation and read its messages
    #[serde(rename_all = "camelCase")]
    ConversationRead {
        conversation_id: ConversationId,
        reader: UserId,
    },
}

// =============================================================================
// Event Data Structures
// =============================================================================

/// A direct chat message, already persisted by the message service
///
/// The realtime layer relays these verbatim; `content` is absent for pure
/// file messages.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub conversation_id: ConversationId,
    pub sender: UserId,
    pub receiver: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default)]
    pub read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
