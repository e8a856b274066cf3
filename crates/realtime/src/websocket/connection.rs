//! WebSocket connection handle
//!
//! Represents one live WebSocket connection and its outbound event channel.

use tokio::sync::mpsc;

use skillswap_shared::{ConnectionId, ServerEvent, UserId};

/// An active WebSocket connection
///
/// `user_id` is `None` for sessions whose token was absent or failed
/// verification; those sessions can still signal but have no presence entry.
#[derive(Debug)]
pub struct Connection {
    /// Server-assigned identifier for this connection
    pub connection_id: ConnectionId,

    /// Authenticated user, when the connect-time token verified
    pub user_id: Option<UserId>,

    /// Channel to send events to this connection
    pub sender: mpsc::UnboundedSender<ServerEvent>,
}

impl Connection {
    /// Create a new connection with a fresh id
    pub fn new(user_id: Option<UserId>, sender: mpsc::UnboundedSender<ServerEvent>) -> Self {
        Self {
            connection_id: ConnectionId::new(),
            user_id,
            sender,
        }
    }

    /// Send an event to this connection
    ///
    /// Returns Ok(()) if queued successfully, Err if the connection is closed
    #[allow(clippy::result_large_err)] // Error type is from tokio mpsc, containing the failed event
    pub fn send(&self, event: ServerEvent) -> Result<(), mpsc::error::SendError<ServerEvent>> {
        self.sender.send(event)
    }

    /// Whether the connect-time token produced a user identity
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}
