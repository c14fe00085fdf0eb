//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

/// Author of a stored message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Wire name used by chat-completion APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// A single conversation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    /// Auto-incrementing ID, breaks ties between equal timestamps.
    pub id: i64,
    /// Owner of the conversation.
    pub user_id: String,
    /// Who wrote the message.
    pub role: Role,
    /// Message text.
    pub content: String,
    /// Creation timestamp (RFC 3339, UTC, millisecond precision).
    pub created_at: String,
}

/// Coaching focus areas offered on the preferences page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusArea {
    Estudos,
    Saude,
    Academia,
    SaudeMental,
    Produtividade,
    Lazer,
}

impl FocusArea {
    /// All focus areas, in display order.
    pub const ALL: [FocusArea; 6] = [
        FocusArea::Estudos,
        FocusArea::Saude,
        FocusArea::Academia,
        FocusArea::SaudeMental,
        FocusArea::Produtividade,
        FocusArea::Lazer,
    ];

    /// Get the stored tag for this focus area.
    pub fn as_str(&self) -> &'static str {
        match self {
            FocusArea::Estudos => "estudos",
            FocusArea::Saude => "saude",
            FocusArea::Academia => "academia",
            FocusArea::SaudeMental => "saude_mental",
            FocusArea::Produtividade => "produtividade",
            FocusArea::Lazer => "lazer",
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FocusArea::Estudos => "Estudos",
            FocusArea::Saude => "Saúde",
            FocusArea::Academia => "Academia",
            FocusArea::SaudeMental => "Saúde Mental",
            FocusArea::Produtividade => "Produtividade",
            FocusArea::Lazer => "Lazer",
        }
    }

    /// Parse a tag or label from user input.
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|area| area.as_str() == needle || area.label().to_lowercase() == needle)
    }
}

/// The single per-user row holding personal data and coaching preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Owner of the profile.
    pub user_id: String,
    /// Age in years.
    pub age: Option<i64>,
    /// Weight in kilograms.
    pub weight: Option<f64>,
    /// Free-form gender.
    pub gender: Option<String>,
    /// Whether the user is currently studying.
    pub is_student: Option<bool>,
    /// Preference tags.
    pub preferences: Vec<String>,
    /// Main coaching focus.
    pub focus: Option<FocusArea>,
    /// Free-text goals.
    pub goals: Option<String>,
    /// Free-text priority.
    pub priority: Option<String>,
    /// When the profile was created.
    pub created_at: String,
    /// When the profile was last updated.
    pub updated_at: String,
}

impl<'r> FromRow<'r, SqliteRow> for UserProfile {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let preferences = match row.try_get::<Option<String>, _>("preferences")? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
                index: "preferences".to_string(),
                source: Box::new(e),
            })?,
            None => Vec::new(),
        };

        let focus = row
            .try_get::<Option<String>, _>("focus")?
            .as_deref()
            .and_then(FocusArea::parse);

        Ok(Self {
            user_id: row.try_get("user_id")?,
            age: row.try_get("age")?,
            weight: row.try_get("weight")?,
            gender: row.try_get("gender")?,
            is_student: row.try_get("is_student")?,
            preferences,
            focus,
            goals: row.try_get("goals")?,
            priority: row.try_get("priority")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Personal fields written by a profile save. `None` clears the column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFields {
    pub age: Option<i64>,
    pub weight: Option<f64>,
    pub gender: Option<String>,
    pub is_student: Option<bool>,
    pub preferences: Option<Vec<String>>,
    pub goals: Option<String>,
}

/// Coaching fields written by a preferences save. `None` clears the column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceFields {
    pub focus: Option<FocusArea>,
    pub goals: Option<String>,
    pub priority: Option<String>,
}
