//! Chat routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use orchestrator::OrchestratorError;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Error text for a failed quick reply.
pub const QUICK_REPLY_FAILED: &str = "Erro na IA";

/// Request for a chat turn.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "userId", alias = "user_id")]
    pub user_id: Option<String>,
}

/// Request for a one-shot reply.
#[derive(Debug, Deserialize)]
pub struct QuickRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Assistant reply.
#[derive(Debug, Serialize)]
pub struct ReplyResponse {
    pub reply: String,
}

/// Run one chat turn for a user.
pub async fn chat(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>> {
    let Json(req) = payload?;
    let user_id = req.user_id.unwrap_or_default();
    let message = req.message.unwrap_or_default();

    let turn = state.orchestrator.chat(&user_id, &message).await?;

    Ok(Json(ReplyResponse { reply: turn.reply }))
}

/// Stateless coach reply.
pub async fn quick_reply(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QuickRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>> {
    let Json(req) = payload?;
    let message = req.message.unwrap_or_default();

    match state.orchestrator.quick_reply(&message).await {
        Ok(reply) => Ok(Json(ReplyResponse { reply })),
        Err(e @ OrchestratorError::InvalidInput(_)) => Err(e.into()),
        Err(e) => {
            error!("Quick reply failed: {}", e);
            Err(ApiError::Internal(QUICK_REPLY_FAILED.to_string()))
        }
    }
}
