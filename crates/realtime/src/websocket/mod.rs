//! WebSocket realtime layer
//!
//! Presence tracking and meeting room signaling for connected clients.
//! Wire events live in `skillswap-shared` so other services can speak the
//! same protocol.

pub mod connection;
pub mod handler;
pub mod presence;
pub mod room;
pub mod state;

pub use connection::Connection;
pub use handler::ws_handler;
pub use presence::PresenceRegistry;
pub use room::RoomRegistry;
pub use state::{RealtimeState, RealtimeStats};
