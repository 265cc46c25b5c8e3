use thiserror::Error;

/// Error taxonomy returned across the engine boundary.
///
/// Every component-level failure is mapped to one of these before it crosses
/// the boundary; only `Database` and `Crypto` represent unexpected internal
/// conditions rather than domain outcomes. Batch deletes report per-id
/// failures in their result payload instead of erroring.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid or expired session")]
    InvalidSession,

    #[error("Username already exists")]
    AlreadyExists,

    #[error("Account not found")]
    NotFound,

    #[error("Invalid username or password")]
    WrongCredentials,

    #[error("This user's account has been deleted or does not exist")]
    UnknownRecipient,

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
