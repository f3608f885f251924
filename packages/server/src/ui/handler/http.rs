//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::ParticipantDto, ui::state::AppState};
use morsecast_shared::time::timestamp_to_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get every participant known to the registry, ordered by id
pub async fn list_participants(State(state): State<Arc<AppState>>) -> Json<Vec<ParticipantDto>> {
    let participants = state.list_participants_usecase.execute().await;

    // Domain Model から DTO への変換
    let dtos = participants
        .into_iter()
        .map(|presence| ParticipantDto {
            user_id: presence.participant.id.value(),
            color: presence.participant.color.into_string(),
            online: presence.online,
            created_at: timestamp_to_rfc3339(presence.participant.created_at.value()),
        })
        .collect();

    Json(dtos)
}
