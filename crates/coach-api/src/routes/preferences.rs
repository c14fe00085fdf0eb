//! Coaching preferences routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use orchestrator::PreferencesUpdate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::extract::UserId;
use crate::state::AppState;

/// Confirmation text for a preferences save.
pub const PREFERENCES_SAVED: &str = "Preferências salvas com sucesso!";

/// Preferences sent by the client; `focus` may be a tag or a label.
#[derive(Debug, Default, Deserialize)]
pub struct PreferencesRequest {
    #[serde(default)]
    pub focus: Option<String>,
    #[serde(default)]
    pub goals: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Get the caller's preferences, or `{}` when none are stored.
pub async fn get_preferences(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<Value>> {
    let preferences = state.orchestrator.profiles().get_preferences(&user_id).await?;

    let body = match preferences {
        Some(preferences) => {
            serde_json::to_value(preferences).map_err(|e| ApiError::Internal(e.to_string()))?
        }
        None => Value::Object(Default::default()),
    };

    Ok(Json(body))
}

/// Replace the caller's preferences.
pub async fn save_preferences(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: std::result::Result<Json<PreferencesRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(req) = payload?;

    let update = PreferencesUpdate {
        focus: req.focus,
        goals: req.goals,
        priority: req.priority,
    };
    state
        .orchestrator
        .profiles()
        .save_preferences(&user_id, update)
        .await?;

    Ok(Json(MessageResponse {
        message: PREFERENCES_SAVED.to_string(),
    }))
}
