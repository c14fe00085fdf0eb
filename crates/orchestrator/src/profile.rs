//! User profile management for the orchestrator.

use coach_database::validation::{
    validate_age, validate_tags, validate_text, validate_user_id, validate_weight,
    MAX_GOALS_LENGTH, MAX_SHORT_TEXT_LENGTH,
};
use coach_database::{
    user_profile, Database, FocusArea, PreferenceFields, ProfileFields, UserProfile,
    ValidationError,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::OrchestratorError;

/// Coaching preferences as exposed by the preferences endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preferences {
    pub focus: Option<FocusArea>,
    pub goals: Option<String>,
    pub priority: Option<String>,
}

impl From<&UserProfile> for Preferences {
    fn from(profile: &UserProfile) -> Self {
        Self {
            focus: profile.focus,
            goals: profile.goals.clone(),
            priority: profile.priority.clone(),
        }
    }
}

/// Unvalidated preferences input; `focus` is a tag or label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesUpdate {
    pub focus: Option<String>,
    pub goals: Option<String>,
    pub priority: Option<String>,
}

/// Profile store for the single per-user row.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    database: Database,
}

impl ProfileStore {
    /// Create a profile store backed by the database.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Get a user's profile.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, OrchestratorError> {
        validate_user_id(user_id)?;
        Ok(user_profile::get_profile(self.database.pool(), user_id.trim()).await?)
    }

    /// Get a user's profile, logging and swallowing lookup failures.
    pub async fn find_profile(&self, user_id: &str) -> Option<UserProfile> {
        match self.get_profile(user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Failed to get profile for {}: {}", user_id, e);
                None
            }
        }
    }

    /// Replace the personal fields of a user's profile.
    ///
    /// Validates every field before storing; text fields are trimmed and
    /// blank values stored as absent.
    pub async fn save_profile(
        &self,
        user_id: &str,
        fields: ProfileFields,
    ) -> Result<(), OrchestratorError> {
        validate_user_id(user_id)?;

        let fields = ProfileFields {
            gender: normalize(fields.gender),
            goals: normalize(fields.goals),
            preferences: fields.preferences.map(|tags| {
                tags.into_iter()
                    .map(|tag| tag.trim().to_string())
                    .collect::<Vec<_>>()
            }),
            ..fields
        };

        validate_age(fields.age)?;
        validate_weight(fields.weight)?;
        validate_text("gender", fields.gender.as_deref(), MAX_SHORT_TEXT_LENGTH)?;
        validate_tags(fields.preferences.as_deref())?;
        validate_text("goals", fields.goals.as_deref(), MAX_GOALS_LENGTH)?;

        user_profile::upsert_profile(self.database.pool(), user_id.trim(), &fields).await?;

        debug!("Saved profile for {}", user_id);
        Ok(())
    }

    /// Get a user's coaching preferences.
    pub async fn get_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<Preferences>, OrchestratorError> {
        let profile = self.get_profile(user_id).await?;
        Ok(profile.as_ref().map(Preferences::from))
    }

    /// Replace a user's coaching preferences.
    pub async fn save_preferences(
        &self,
        user_id: &str,
        update: PreferencesUpdate,
    ) -> Result<(), OrchestratorError> {
        validate_user_id(user_id)?;

        let focus = match normalize(update.focus) {
            Some(raw) => Some(FocusArea::parse(&raw).ok_or(ValidationError::UnknownFocus(raw))?),
            None => None,
        };
        let fields = PreferenceFields {
            focus,
            goals: normalize(update.goals),
            priority: normalize(update.priority),
        };

        validate_text("goals", fields.goals.as_deref(), MAX_GOALS_LENGTH)?;
        validate_text("priority", fields.priority.as_deref(), MAX_SHORT_TEXT_LENGTH)?;

        user_profile::upsert_preferences(self.database.pool(), user_id.trim(), &fields).await?;

        debug!("Saved preferences for {}", user_id);
        Ok(())
    }
}

/// Trim a text field, mapping blank values to `None`.
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> ProfileStore {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        ProfileStore::new(db)
    }

    #[tokio::test]
    async fn test_missing_profile() {
        let store = test_store().await;
        assert!(store.get_profile("user-1").await.unwrap().is_none());
        assert!(store.get_preferences("user-1").await.unwrap().is_none());
        assert!(store.find_profile("user-1").await.is_none());
    }

    #[tokio::test]
    async fn test_save_profile_normalizes() {
        let store = test_store().await;
        let fields = ProfileFields {
            age: Some(35),
            gender: Some("  ".to_string()),
            preferences: Some(vec![" corrida ".to_string()]),
            goals: Some(" Perder 5kg ".to_string()),
            ..Default::default()
        };

        store.save_profile("user-1", fields).await.unwrap();

        let profile = store.get_profile("user-1").await.unwrap().unwrap();
        assert!(profile.gender.is_none());
        assert_eq!(profile.preferences, vec!["corrida"]);
        assert_eq!(profile.goals.as_deref(), Some("Perder 5kg"));
    }

    #[tokio::test]
    async fn test_save_profile_rejects_invalid_age() {
        let store = test_store().await;
        let fields = ProfileFields {
            age: Some(-4),
            ..Default::default()
        };

        let err = store.save_profile("user-1", fields).await.unwrap_err();
        assert!(err.is_client_error());
        assert!(store.get_profile("user-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_preferences_parses_focus() {
        let store = test_store().await;
        let update = PreferencesUpdate {
            focus: Some("Saúde Mental".to_string()),
            goals: Some("Respirar melhor".to_string()),
            priority: None,
        };

        store.save_preferences("user-1", update).await.unwrap();

        let prefs = store.get_preferences("user-1").await.unwrap().unwrap();
        assert_eq!(prefs.focus, Some(FocusArea::SaudeMental));
        assert_eq!(prefs.goals.as_deref(), Some("Respirar melhor"));
        assert!(prefs.priority.is_none());
    }

    #[tokio::test]
    async fn test_save_preferences_unknown_focus() {
        let store = test_store().await;
        let update = PreferencesUpdate {
            focus: Some("xadrez".to_string()),
            ..Default::default()
        };

        let err = store.save_preferences("user-1", update).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::InvalidInput(ref msg) if msg.contains("xadrez")));
    }

    #[tokio::test]
    async fn test_requires_user_id() {
        let store = test_store().await;
        let err = store
            .save_preferences(" ", PreferencesUpdate::default())
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }
}
