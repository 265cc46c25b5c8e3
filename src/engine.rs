use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::time::Duration;

use crate::config::EngineConfig;
use crate::db::{
    self, accounts::wildcard_to_like, AccountInfo, AccountRepository, DeleteReport, Message,
    MessageRepository, SessionRepository,
};
use crate::error::ChatError;
use crate::password::{generate_salt, hash_password, verify_password};

#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct AccountPage {
    pub accounts: Vec<AccountInfo>,
    pub total_count: i64,
    pub has_more: bool,
}

#[derive(Debug, Serialize)]
pub struct MessageBatch {
    pub messages: Vec<Message>,
    pub has_more: bool,
}

/// The orchestrator behind the exposed procedure surface. Every operation is
/// a short composition of the account, session and message repositories over
/// a shared pool; atomicity rides on the storage engine's transactions, so
/// the engine is safe to call from any number of concurrent tasks.
///
/// Authenticated operations resolve their session token first and fail with
/// [`ChatError::InvalidSession`] before touching anything else.
#[derive(Clone)]
pub struct ChatEngine {
    pool: Pool<Sqlite>,
    config: EngineConfig,
}

impl ChatEngine {
    /// Open the configured database, bootstrap the schema and return a ready
    /// engine.
    pub async fn connect(config: EngineConfig) -> Result<Self, ChatError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .min_connections(config.db_min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.database_url)
            .await?;

        db::init_schema(&pool).await?;

        Ok(ChatEngine { pool, config })
    }

    /// Wrap an existing pool. The schema must already be initialized.
    pub fn new(pool: Pool<Sqlite>, config: EngineConfig) -> Self {
        ChatEngine { pool, config }
    }

    pub async fn create_account(&self, username: &str, password: &str) -> Result<(), ChatError> {
        if username.is_empty() {
            return Err(ChatError::Validation("Username must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(ChatError::Validation("Password must not be empty".to_string()));
        }

        let salt = generate_salt();
        let hash = hash_password(password, &salt)?;

        AccountRepository::create(&self.pool, username, &hash, &salt).await?;
        tracing::info!(username, "account created");

        Ok(())
    }

    /// Verify credentials and issue a session token. A missing account and a
    /// wrong password both come back as `WrongCredentials` so the response
    /// can't be used to enumerate usernames.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ChatError> {
        tracing::info!(username, "login attempt");

        let account = AccountRepository::get_by_username(&self.pool, username)
            .await?
            .ok_or(ChatError::WrongCredentials)?;

        if !verify_password(password, &account.password_hash, &account.password_salt)? {
            tracing::warn!(username, "login rejected");
            return Err(ChatError::WrongCredentials);
        }

        AccountRepository::touch_last_login(&self.pool, username).await?;

        let session =
            SessionRepository::create(&self.pool, username, self.config.session_expiry_hours)
                .await?;
        let unread_count = MessageRepository::unread_count(&self.pool, username).await?;

        Ok(LoginOutcome {
            token: session.token,
            unread_count,
        })
    }

    /// Idempotent: logging out an already-revoked token succeeds.
    pub async fn logout(&self, token: &str) -> Result<(), ChatError> {
        if let Some(username) = SessionRepository::resolve(&self.pool, token).await? {
            tracing::info!(%username, "logout");
        }
        SessionRepository::revoke(&self.pool, token).await
    }

    /// Paginated directory listing. `pattern` uses shell-style wildcards
    /// (`*`/`?`), empty matches all. `page_number` is 1-based.
    pub async fn list_accounts(
        &self,
        token: &str,
        pattern: &str,
        page_size: i64,
        page_number: i64,
    ) -> Result<AccountPage, ChatError> {
        self.resolve(token).await?;

        if page_size <= 0 {
            return Err(ChatError::Validation("Page size must be positive".to_string()));
        }
        if page_number < 1 {
            return Err(ChatError::Validation("Page number must be at least 1".to_string()));
        }

        let like = wildcard_to_like(pattern);
        let total_count = AccountRepository::count(&self.pool, &like).await?;
        // Saturating arithmetic: an absurdly large page just comes back empty.
        let offset = (page_number - 1).saturating_mul(page_size);
        let accounts = AccountRepository::list(&self.pool, &like, page_size, offset).await?;

        Ok(AccountPage {
            accounts,
            total_count,
            has_more: page_number.saturating_mul(page_size) < total_count,
        })
    }

    /// Delete the calling account. Sessions are revoked before the directory
    /// row goes away, so a half-failed delete can never leave a reachable
    /// account with a live token. Messages are kept: they remain history for
    /// the other party.
    pub async fn delete_account(&self, token: &str) -> Result<(), ChatError> {
        let username = self.resolve(token).await?;

        tracing::info!(%username, "account deletion requested");

        SessionRepository::revoke_all_for(&self.pool, &username).await?;
        AccountRepository::delete(&self.pool, &username).await?;

        tracing::info!(%username, "account deleted");

        Ok(())
    }

    /// Store a message for later retrieval by the recipient. The recipient
    /// must currently exist; messages to since-deleted accounts are refused.
    pub async fn send_message(
        &self,
        token: &str,
        recipient: &str,
        content: &str,
    ) -> Result<String, ChatError> {
        let sender = self.resolve(token).await?;

        if AccountRepository::get_by_username(&self.pool, recipient)
            .await?
            .is_none()
        {
            tracing::warn!(%sender, recipient, "send to unknown recipient");
            return Err(ChatError::UnknownRecipient);
        }

        let message = MessageRepository::append(&self.pool, &sender, recipient, content).await?;

        tracing::info!(
            %sender,
            recipient,
            message_id = %message.message_id,
            size = content.len(),
            "message stored"
        );

        Ok(message.message_id)
    }

    /// Every non-deleted message the caller sent or received, oldest first.
    /// `max_messages <= 0` falls back to the configured default cap.
    pub async fn get_messages(
        &self,
        token: &str,
        max_messages: i64,
    ) -> Result<MessageBatch, ChatError> {
        let username = self.resolve(token).await?;

        let limit = if max_messages > 0 {
            max_messages
        } else {
            self.config.default_message_limit
        };

        let (messages, has_more) =
            MessageRepository::get_for_user(&self.pool, &username, limit).await?;

        Ok(MessageBatch { messages, has_more })
    }

    /// Soft-delete a batch of the caller's sent messages. Partial failure is
    /// reported per id, never raised.
    pub async fn delete_messages(
        &self,
        token: &str,
        message_ids: &[String],
    ) -> Result<DeleteReport, ChatError> {
        let username = self.resolve(token).await?;

        let report = MessageRepository::mark_deleted(&self.pool, &username, message_ids).await?;

        if !report.failed.is_empty() {
            tracing::warn!(
                %username,
                failed = report.failed.len(),
                "some messages could not be deleted"
            );
        }

        Ok(report)
    }

    /// Mark everything `other_user` sent the caller as read; returns how many
    /// messages flipped (zero on repeat calls).
    pub async fn mark_conversation_as_read(
        &self,
        token: &str,
        other_user: &str,
    ) -> Result<u64, ChatError> {
        let username = self.resolve(token).await?;
        MessageRepository::mark_conversation_read(&self.pool, &username, other_user).await
    }

    async fn resolve(&self, token: &str) -> Result<String, ChatError> {
        SessionRepository::resolve(&self.pool, token)
            .await?
            .ok_or(ChatError::InvalidSession)
    }
}
