//! Per-user profile storage.
//!
//! Each user owns at most one row. Personal fields and coaching preferences
//! share the row and are written by two independent upserts, so saving one
//! set never clobbers the other. `goals` belongs to both sets: either upsert
//! writes it when given and leaves it unchanged when absent.

use sqlx::SqlitePool;

use crate::models::{PreferenceFields, ProfileFields, UserProfile};
use crate::validation::validate_user_id;
use crate::Result;

/// Get a user's profile.
pub async fn get_profile(pool: &SqlitePool, user_id: &str) -> Result<Option<UserProfile>> {
    validate_user_id(user_id)?;

    let record = sqlx::query_as::<_, UserProfile>(
        r#"
        SELECT user_id, age, weight, gender, is_student, preferences,
               focus, goals, priority, created_at, updated_at
        FROM user_profiles
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Write the personal fields of a user's profile.
///
/// Creates the profile if it doesn't exist. Every personal column is
/// overwritten and `None` clears it, except the shared `goals` which keeps
/// its stored value when `None`. Coaching preferences are left untouched.
pub async fn upsert_profile(pool: &SqlitePool, user_id: &str, fields: &ProfileFields) -> Result<()> {
    validate_user_id(user_id)?;

    let preferences = fields
        .preferences
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    sqlx::query(
        r#"
        INSERT INTO user_profiles (user_id, age, weight, gender, is_student, preferences, goals)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            age = excluded.age,
            weight = excluded.weight,
            gender = excluded.gender,
            is_student = excluded.is_student,
            preferences = excluded.preferences,
            goals = COALESCE(excluded.goals, user_profiles.goals),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        "#,
    )
    .bind(user_id)
    .bind(fields.age)
    .bind(fields.weight)
    .bind(fields.gender.as_deref())
    .bind(fields.is_student)
    .bind(preferences)
    .bind(fields.goals.as_deref())
    .execute(pool)
    .await?;

    Ok(())
}

/// Write the coaching preferences of a user's profile.
///
/// Creates the profile if it doesn't exist. Focus and priority are
/// overwritten and `None` clears them; the shared `goals` keeps its stored
/// value when `None`. Personal fields are left untouched.
pub async fn upsert_preferences(
    pool: &SqlitePool,
    user_id: &str,
    fields: &PreferenceFields,
) -> Result<()> {
    validate_user_id(user_id)?;

    sqlx::query(
        r#"
        INSERT INTO user_profiles (user_id, focus, goals, priority)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            focus = excluded.focus,
            goals = COALESCE(excluded.goals, user_profiles.goals),
            priority = excluded.priority,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        "#,
    )
    .bind(user_id)
    .bind(fields.focus.map(|focus| focus.as_str()))
    .bind(fields.goals.as_deref())
    .bind(fields.priority.as_deref())
    .execute(pool)
    .await?;

    Ok(())
}

/// Count profile rows for a user (0 or 1).
pub async fn count_profiles(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM user_profiles WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
