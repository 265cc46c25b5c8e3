use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: Vec<u8>,
    #[serde(skip_serializing)]
    pub password_salt: Vec<u8>,
    pub created_at: i64,
    pub last_login: Option<i64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub created_at: i64,
    pub expires_at: i64,
}

/// A stored direct message. `timestamp` is in milliseconds.
///
/// `delivered` is set at append time: in the polling model a message counts as
/// delivered once it is observable via retrieval. `unread` only ever goes
/// true -> false, `deleted` only false -> true.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    pub sender: String,
    pub recipient: String,
    pub content: String,
    pub timestamp: i64,
    pub delivered: bool,
    pub unread: bool,
    pub deleted: bool,
}

/// Directory listing entry. `is_online` is derived from live sessions,
/// never stored.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AccountInfo {
    pub username: String,
    pub is_online: bool,
}
