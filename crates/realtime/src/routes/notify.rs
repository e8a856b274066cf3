//! Internal notification endpoints
//!
//! Called by the main SkillSwap API when it needs to push an event to a
//! user's live connections. Guarded by a shared service token rather than
//! user JWTs, so these routes must never be exposed to the public internet.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use skillswap_shared::{RoomId, ServerEvent, UserId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Push payload for a meeting invitation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingStartedRequest {
    /// Invitee whose live connections receive the event
    pub user_id: UserId,
    pub meeting_id: RoomId,
    pub inviter_id: UserId,
    pub inviter_name: String,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    /// How many live connections the event was queued for; 0 means the
    /// invitee is offline and the caller should fall back to email
    pub delivered: usize,
}

/// Push a meeting invitation to the invitee's live connections
pub async fn meeting_started(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<MeetingStartedRequest>,
) -> ApiResult<Json<NotifyResponse>> {
    if let Some(expected) = &state.config.internal_api_token {
        let presented = headers.get("x-internal-token").and_then(|v| v.to_str().ok());
        if presented != Some(expected.as_str()) {
            return Err(ApiError::Unauthorized);
        }
    }

    if req.user_id.as_str().is_empty() {
        return Err(ApiError::BadRequest("userId must not be empty".to_string()));
    }

    let MeetingStartedRequest {
        user_id,
        meeting_id,
        inviter_id,
        inviter_name,
        title,
        created_at,
    } = req;

    let delivered = state
        .realtime
        .notify_user(
            &user_id,
            ServerEvent::MeetingStarted {
                meeting_id,
                inviter_id,
                inviter_name,
                title,
                created_at,
            },
        )
        .await;

    tracing::info!(user = %user_id, delivered, "Meeting invitation pushed");

    Ok(Json(NotifyResponse { delivered }))
}
