use sqlx::{Pool, Sqlite};

use crate::db::models::{Account, AccountInfo};
use crate::error::ChatError;

/// Account Directory: owns account records, enforces username uniqueness and
/// serves the paginated wildcard listing. Online status is derived from the
/// sessions table at query time.
pub struct AccountRepository;

impl AccountRepository {
    /// Insert-if-absent. The primary key conflict clause makes concurrent
    /// creations of the same username resolve to exactly one success.
    pub async fn create(
        pool: &Pool<Sqlite>,
        username: &str,
        password_hash: &[u8],
        password_salt: &[u8],
    ) -> Result<(), ChatError> {
        let created_at = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
INSERT INTO accounts (username, password_hash, password_salt, created_at)
VALUES (?, ?, ?, ?)
ON CONFLICT(username) DO NOTHING
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(password_salt)
        .bind(created_at)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ChatError::AlreadyExists);
        }

        Ok(())
    }

    pub async fn get_by_username(
        pool: &Pool<Sqlite>,
        username: &str,
    ) -> Result<Option<Account>, ChatError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

        Ok(account)
    }

    pub async fn touch_last_login(pool: &Pool<Sqlite>, username: &str) -> Result<(), ChatError> {
        let now = chrono::Utc::now().timestamp();

        sqlx::query("UPDATE accounts SET last_login = ? WHERE username = ?")
            .bind(now)
            .bind(username)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// One page of the directory, username ascending so repeated calls over an
    /// unchanged directory are stable. `pattern` is already in LIKE form (see
    /// [`wildcard_to_like`]); `offset` is row-based, computed by the engine.
    pub async fn list(
        pool: &Pool<Sqlite>,
        like_pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AccountInfo>, ChatError> {
        let now = chrono::Utc::now().timestamp();

        let accounts = sqlx::query_as::<_, AccountInfo>(
            r#"
SELECT a.username,
       EXISTS(
           SELECT 1 FROM sessions s
           WHERE s.username = a.username AND s.expires_at > ?
       ) AS is_online
FROM accounts a
WHERE a.username LIKE ? ESCAPE '\'
ORDER BY a.username ASC
LIMIT ? OFFSET ?
            "#,
        )
        .bind(now)
        .bind(like_pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(accounts)
    }

    /// Total number of accounts matching the filter, for pagination metadata.
    pub async fn count(pool: &Pool<Sqlite>, like_pattern: &str) -> Result<i64, ChatError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE username LIKE ? ESCAPE '\\'")
                .bind(like_pattern)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    pub async fn delete(pool: &Pool<Sqlite>, username: &str) -> Result<(), ChatError> {
        let result = sqlx::query("DELETE FROM accounts WHERE username = ?")
            .bind(username)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ChatError::NotFound);
        }

        Ok(())
    }
}

/// Translate a shell-style wildcard pattern (`*` = any run, `?` = one char)
/// into a SQL LIKE pattern, escaping LIKE's own metacharacters. An empty
/// pattern matches every username.
pub fn wildcard_to_like(pattern: &str) -> String {
    if pattern.is_empty() {
        return "%".to_string();
    }

    let mut like = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '*' => like.push('%'),
            '?' => like.push('_'),
            '%' | '_' | '\\' => {
                like.push('\\');
                like.push(c);
            }
            _ => like.push(c),
        }
    }
    like
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_translation() {
        assert_eq!(wildcard_to_like(""), "%");
        assert_eq!(wildcard_to_like("*"), "%");
        assert_eq!(wildcard_to_like("al?ce"), "al_ce");
        assert_eq!(wildcard_to_like("*li*"), "%li%");
        assert_eq!(wildcard_to_like("bob"), "bob");
    }

    #[test]
    fn test_like_metacharacters_escaped() {
        assert_eq!(wildcard_to_like("50%"), "50\\%");
        assert_eq!(wildcard_to_like("a_b"), "a\\_b");
        assert_eq!(wildcard_to_like("a\\b"), "a\\\\b");
    }
}
