use serde::Serialize;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::db::models::Message;
use crate::error::ChatError;

/// Outcome of a batch soft delete. Each id is attempted independently; a bad
/// id never aborts the rest of the batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteReport {
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
}

/// Message Store: append, retrieve, soft-delete, mark-read. Its contract is
/// "all messages touching a user"; filtering down to a single conversation
/// partner is the caller's concern.
pub struct MessageRepository;

impl MessageRepository {
    /// Persist a new message. In the polling model a message is delivered the
    /// moment it is stored, so `delivered` starts true and `unread` starts
    /// true until the recipient marks the conversation read. Account
    /// existence is validated by the engine before this is called.
    pub async fn append(
        pool: &Pool<Sqlite>,
        sender: &str,
        recipient: &str,
        content: &str,
    ) -> Result<Message, ChatError> {
        let message_id = Uuid::new_v4().to_string();
        // Milliseconds so racing sends in the same second still order.
        let timestamp = chrono::Utc::now().timestamp_millis();

        sqlx::query(
            r#"
INSERT INTO messages (message_id, sender, recipient, content, timestamp, delivered, unread, deleted)
VALUES (?, ?, ?, ?, ?, TRUE, TRUE, FALSE)
            "#,
        )
        .bind(&message_id)
        .bind(sender)
        .bind(recipient)
        .bind(content)
        .bind(timestamp)
        .execute(pool)
        .await?;

        Ok(Message {
            message_id,
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            content: content.to_string(),
            timestamp,
            delivered: true,
            unread: true,
            deleted: false,
        })
    }

    /// All non-deleted messages where the user is sender or recipient,
    /// oldest first, ties broken by message id for determinism. Fetches one
    /// row past `limit` to learn whether more remain.
    pub async fn get_for_user(
        pool: &Pool<Sqlite>,
        username: &str,
        limit: i64,
    ) -> Result<(Vec<Message>, bool), ChatError> {
        let mut messages = sqlx::query_as::<_, Message>(
            r#"
SELECT message_id, sender, recipient, content, timestamp, delivered, unread, deleted
FROM messages
WHERE (sender = ? OR recipient = ?) AND deleted = FALSE
ORDER BY timestamp ASC, message_id ASC
LIMIT ?
            "#,
        )
        .bind(username)
        .bind(username)
        .bind(limit.saturating_add(1))
        .fetch_all(pool)
        .await?;

        let has_more = messages.len() as i64 > limit;
        if has_more {
            messages.truncate(limit as usize);
        }

        Ok((messages, has_more))
    }

    /// Soft-delete each id independently. Only the sender of a message may
    /// delete it; ids that are unknown, already deleted, or sent by someone
    /// else land in `failed`.
    pub async fn mark_deleted(
        pool: &Pool<Sqlite>,
        username: &str,
        message_ids: &[String],
    ) -> Result<DeleteReport, ChatError> {
        let mut report = DeleteReport::default();

        for message_id in message_ids {
            let result = sqlx::query(
                r#"
UPDATE messages
SET deleted = TRUE
WHERE message_id = ? AND sender = ? AND deleted = FALSE
                "#,
            )
            .bind(message_id)
            .bind(username)
            .execute(pool)
            .await?;

            if result.rows_affected() == 0 {
                report.failed.push(message_id.clone());
            } else {
                report.deleted.push(message_id.clone());
            }
        }

        Ok(report)
    }

    /// Mark every message from `other_user` to `username` as read, returning
    /// how many flipped. The `unread` guard makes a repeat call report zero.
    pub async fn mark_conversation_read(
        pool: &Pool<Sqlite>,
        username: &str,
        other_user: &str,
    ) -> Result<u64, ChatError> {
        let result = sqlx::query(
            r#"
UPDATE messages
SET unread = FALSE
WHERE sender = ? AND recipient = ? AND unread = TRUE AND deleted = FALSE
            "#,
        )
        .bind(other_user)
        .bind(username)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Unread, non-deleted messages addressed to the user. Reported at login.
    pub async fn unread_count(pool: &Pool<Sqlite>, username: &str) -> Result<i64, ChatError> {
        let count: i64 = sqlx::query_scalar(
            r#"
SELECT COUNT(*)
FROM messages
WHERE recipient = ? AND unread = TRUE AND deleted = FALSE
            "#,
        )
        .bind(username)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
