//! Conversation history routes.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use database::{Message, Role};
use orchestrator::AssistantIndicator;
use serde::Serialize;

use crate::error::Result;
use crate::extract::UserId;
use crate::state::AppState;

/// A stored message as shown by the chat view.
#[derive(Debug, Serialize)]
pub struct HistoryMessage {
    pub role: Role,
    pub content: String,
    pub created_at: String,
}

impl From<Message> for HistoryMessage {
    fn from(msg: Message) -> Self {
        Self {
            role: msg.role,
            content: msg.content,
            created_at: msg.created_at,
        }
    }
}

/// Transcript response.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<HistoryMessage>,
    pub indicator: AssistantIndicator,
}

/// Result of clearing the history.
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub deleted: u64,
}

/// Get the most recent messages of the caller.
pub async fn get_history(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<HistoryResponse>> {
    let transcript = state.orchestrator.transcript(&user_id, Utc::now()).await?;

    Ok(Json(HistoryResponse {
        messages: transcript.messages.into_iter().map(HistoryMessage::from).collect(),
        indicator: transcript.indicator,
    }))
}

/// Delete every message of the caller.
pub async fn clear_history(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<ClearResponse>> {
    let deleted = state.orchestrator.clear_history(&user_id).await?;
    Ok(Json(ClearResponse { deleted }))
}
