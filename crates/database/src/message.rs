//! Conversation message persistence.

use sqlx::SqlitePool;

use crate::models::{Message, Role};
use crate::validation::validate_user_id;
use crate::Result;

/// Append a message to a user's conversation.
///
/// Returns the new row ID.
pub async fn insert_message(
    pool: &SqlitePool,
    user_id: &str,
    role: Role,
    content: &str,
) -> Result<i64> {
    validate_user_id(user_id)?;

    let result = sqlx::query(
        r#"
        INSERT INTO messages (user_id, role, content)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(role)
    .bind(content)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Get the most recent messages for a user, oldest first.
///
/// At most `limit` rows are returned; older rows beyond the limit are skipped.
pub async fn recent_messages(pool: &SqlitePool, user_id: &str, limit: i64) -> Result<Vec<Message>> {
    validate_user_id(user_id)?;

    let rows = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, user_id, role, content, created_at
        FROM (
            SELECT id, user_id, role, content, created_at
            FROM messages
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ?
        )
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete every message belonging to a user.
///
/// Returns the number of rows removed.
pub async fn delete_messages(pool: &SqlitePool, user_id: &str) -> Result<u64> {
    validate_user_id(user_id)?;

    let result = sqlx::query(
        r#"
        DELETE FROM messages
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Count messages for a user.
pub async fn count_messages(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM messages WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
