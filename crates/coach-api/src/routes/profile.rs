//! Profile routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use database::{ProfileFields, UserProfile};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::extract::UserId;
use crate::state::AppState;

/// Personal fields of a profile, as sent and returned by the client.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub is_student: Option<bool>,
    #[serde(default)]
    pub preferences: Option<Vec<String>>,
    #[serde(default)]
    pub goals: Option<String>,
}

impl From<UserProfile> for ProfileBody {
    fn from(profile: UserProfile) -> Self {
        Self {
            age: profile.age,
            weight: profile.weight,
            gender: profile.gender,
            is_student: profile.is_student,
            preferences: Some(profile.preferences),
            goals: profile.goals,
        }
    }
}

impl From<ProfileBody> for ProfileFields {
    fn from(body: ProfileBody) -> Self {
        Self {
            age: body.age,
            weight: body.weight,
            gender: body.gender,
            is_student: body.is_student,
            preferences: body.preferences,
            goals: body.goals,
        }
    }
}

/// Acknowledgement of a profile save.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
}

/// Get the caller's profile, or `{}` when none is stored.
pub async fn get_profile(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> Result<Json<Value>> {
    let profile = state.orchestrator.profiles().get_profile(&user_id).await?;

    let body = match profile {
        Some(profile) => serde_json::to_value(ProfileBody::from(profile))
            .map_err(|e| ApiError::Internal(e.to_string()))?,
        None => Value::Object(Default::default()),
    };

    Ok(Json(body))
}

/// Replace the caller's personal profile fields.
pub async fn save_profile(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    payload: std::result::Result<Json<ProfileBody>, JsonRejection>,
) -> Result<Json<SaveResponse>> {
    let Json(body) = payload?;

    state
        .orchestrator
        .profiles()
        .save_profile(&user_id, body.into())
        .await?;

    Ok(Json(SaveResponse { success: true }))
}
