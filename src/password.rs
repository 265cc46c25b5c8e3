use argon2::Argon2;
use rand::Rng;

use crate::error::ChatError;

/// Generate a cryptographically secure random salt
pub fn generate_salt() -> [u8; 32] {
    rand::thread_rng().gen()
}

/// Hash a password with Argon2id using the provided salt
pub fn hash_password(password: &str, salt: &[u8]) -> Result<[u8; 32], ChatError> {
    let argon2 = Argon2::default();
    let mut hash = [0u8; 32];

    argon2
        .hash_password_into(password.as_bytes(), salt, &mut hash)
        .map_err(|e| ChatError::Crypto(format!("Password hashing failed: {}", e)))?;

    Ok(hash)
}

/// Verify a password against a stored hash and salt
pub fn verify_password(password: &str, stored_hash: &[u8], salt: &[u8]) -> Result<bool, ChatError> {
    let computed_hash = hash_password(password, salt)?;
    Ok(computed_hash.as_slice() == stored_hash)
}
