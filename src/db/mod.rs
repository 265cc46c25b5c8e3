pub mod models;
pub mod accounts;
pub mod sessions;
pub mod messages;

pub use models::{Account, AccountInfo, Message, Session};
pub use accounts::AccountRepository;
pub use sessions::SessionRepository;
pub use messages::{DeleteReport, MessageRepository};

use sqlx::{Pool, Sqlite};

use crate::error::ChatError;

/// Create tables and indexes if they don't exist. Safe to call on every
/// startup; existing data is untouched.
pub async fn init_schema(pool: &Pool<Sqlite>) -> Result<(), ChatError> {
    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS accounts (
    username TEXT PRIMARY KEY,
    password_hash BLOB NOT NULL,
    password_salt BLOB NOT NULL,
    created_at INTEGER NOT NULL,
    last_login INTEGER
)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY,
    username TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    expires_at INTEGER NOT NULL
)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
CREATE TABLE IF NOT EXISTS messages (
    message_id TEXT PRIMARY KEY,
    sender TEXT NOT NULL,
    recipient TEXT NOT NULL,
    content TEXT NOT NULL,
    timestamp BIGINT NOT NULL,
    delivered BOOLEAN NOT NULL DEFAULT FALSE,
    unread BOOLEAN NOT NULL DEFAULT TRUE,
    deleted BOOLEAN NOT NULL DEFAULT FALSE
)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_username ON sessions(username)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_sender ON messages(sender)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_recipient ON messages(recipient)")
        .execute(pool)
        .await?;

    Ok(())
}
