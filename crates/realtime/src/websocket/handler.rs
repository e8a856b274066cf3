//! WebSocket connection handler
//!
//! Upgrades the HTTP request and runs the per-connection send pump and
//! receive loop, dispatching client events into [`RealtimeState`].
//! Authentication is attempted from the `token` query parameter but never
//! blocks the upgrade: connections without a valid token stay anonymous.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{stream::StreamExt, SinkExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use skillswap_shared::{ClientEvent, ServerEvent, UserId};

use super::connection::Connection;
use crate::state::AppState;

/// Query parameters accepted on the WebSocket endpoint
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// JWT issued at login, passed as `?token=...`
    pub token: Option<String>,
}

/// WebSocket upgrade handler for `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
) -> Response {
    let user_id = state.authenticator.authenticate(query.token.as_deref());

    match &user_id {
        Some(user_id) => {
            tracing::info!(user = %user_id, "WebSocket upgrade for authenticated user");
        }
        None => {
            tracing::info!("WebSocket upgrade for anonymous connection");
        }
    }

    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

/// Handle an established WebSocket connection until it closes
async fn handle_socket(socket: WebSocket, state: AppState, user_id: Option<UserId>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let conn = state
        .realtime
        .add_connection(Connection::new(user_id, tx))
        .await;
    let connection_id = conn.connection_id;

    // The id ack must be the first frame the client sees; everything the
    // client sends refers to connection ids from this handshake.
    let _ = conn.send(ServerEvent::Connected { connection_id });

    // Pump server events from the connection channel out to the socket
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize server event");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        if let Ok(msg) = msg {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => handle_client_event(&state, &conn, event).await,
                    Err(e) => {
                        // Malformed frames are dropped without a reply
                        tracing::warn!(
                            connection_id = %connection_id,
                            error = %e,
                            message = %text,
                            "Ignoring malformed client event"
                        );
                    }
                },
                Message::Close(_) => {
                    tracing::info!(connection_id = %connection_id, "WebSocket close frame received");
                    break;
                }
                Message::Ping(_) | Message::Pong(_) => {
                    // Axum handles ping/pong automatically
                }
                _ => {}
            }
        }
    }

    state.realtime.remove_connection(connection_id).await;
    send_task.abort();
}

/// Dispatch one parsed client event
async fn handle_client_event(state: &AppState, conn: &Arc<Connection>, event: ClientEvent) {
    match event {
        ClientEvent::JoinRoom { room_id } => {
            state.realtime.rooms.join(&room_id, conn).await;
        }
        ClientEvent::LeaveRoom { room_id } => {
            state
                .realtime
                .leave_room(&room_id, conn.connection_id)
                .await;
        }
        ClientEvent::UserInfo { room_id, user_name } => {
            state
                .realtime
                .rooms
                .broadcast_peer_info(&room_id, conn.connection_id, &user_name)
                .await;
        }
        ClientEvent::Offer {
            target_connection_id,
            description,
            room_id,
        } => {
            state
                .realtime
                .relay_offer(conn.connection_id, target_connection_id, description, room_id)
                .await;
        }
        ClientEvent::Answer {
            target_connection_id,
            description,
            room_id,
        } => {
            state
                .realtime
                .relay_answer(conn.connection_id, target_connection_id, description, room_id)
                .await;
        }
        ClientEvent::IceCandidate {
            target_connection_id,
            candidate,
            room_id,
        } => {
            state
                .realtime
                .relay_ice_candidate(conn.connection_id, target_connection_id, candidate, room_id)
                .await;
        }
        ClientEvent::SendMessage { message } => {
            state.realtime.relay_chat_message(conn, message).await;
        }
        ClientEvent::OpenConversation {
            conversation_id,
            peer_id,
        } => {
            state
                .realtime
                .mark_conversation_read(conn, conversation_id, peer_id)
                .await;
        }
    }
}
