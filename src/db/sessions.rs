use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::db::models::Session;
use crate::error::ChatError;

/// Session Manager: issues, resolves and revokes opaque tokens. At most one
/// live token exists per account; a new login supersedes the previous one.
pub struct SessionRepository;

impl SessionRepository {
    /// Issue a fresh token for `username`, revoking any prior token in the
    /// same transaction so two racing logins still leave exactly one live
    /// session.
    pub async fn create(
        pool: &Pool<Sqlite>,
        username: &str,
        expiry_hours: i64,
    ) -> Result<Session, ChatError> {
        let token = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();
        let expires_at = created_at + expiry_hours * 3600;

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM sessions WHERE username = ?")
            .bind(username)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
INSERT INTO sessions (token, username, created_at, expires_at)
VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&token)
        .bind(username)
        .bind(created_at)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Session {
            token,
            username: username.to_string(),
            created_at,
            expires_at,
        })
    }

    /// Map a token back to its username. Read-only; returns `None` for
    /// unknown, revoked or expired tokens.
    pub async fn resolve(pool: &Pool<Sqlite>, token: &str) -> Result<Option<String>, ChatError> {
        let now = chrono::Utc::now().timestamp();

        let username: Option<String> =
            sqlx::query_scalar("SELECT username FROM sessions WHERE token = ? AND expires_at > ?")
                .bind(token)
                .bind(now)
                .fetch_optional(pool)
                .await?;

        Ok(username)
    }

    /// Idempotent: revoking an unknown token is not an error.
    pub async fn revoke(pool: &Pool<Sqlite>, token: &str) -> Result<(), ChatError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Drop every session for an account. Used on account deletion.
    pub async fn revoke_all_for(pool: &Pool<Sqlite>, username: &str) -> Result<(), ChatError> {
        sqlx::query("DELETE FROM sessions WHERE username = ?")
            .bind(username)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn is_online(pool: &Pool<Sqlite>, username: &str) -> Result<bool, ChatError> {
        let now = chrono::Utc::now().timestamp();

        let online: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sessions WHERE username = ? AND expires_at > ?)",
        )
        .bind(username)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(online)
    }
}
