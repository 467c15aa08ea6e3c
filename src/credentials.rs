//! # Credential Hashing
//!
//! User passwords are persisted only as Argon2id PHC strings. The
//! plaintext from a request never reaches the store.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Result type for credential operations
pub type CredentialResult<T> = Result<T, CredentialError>;

/// Credential hashing errors
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    /// Argon2 refused to hash the password
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored value is not a PHC hash string
    #[error("Stored password is not a valid hash")]
    MalformedHash,
}

impl CredentialError {
    /// Stable code exposed to clients
    pub fn code(&self) -> &'static str {
        "CREDENTIAL_FAILURE"
    }
}

/// Hash a password using Argon2id with a random salt
pub fn hash_password(password: &str) -> CredentialResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::HashingFailed(e.to_string()))
}

/// Verify a password against its stored hash
pub fn verify_password(password: &str, hash: &str) -> CredentialResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|_| CredentialError::MalformedHash)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("123456").unwrap();

        assert_ne!(hash, "123456");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("123456", &hash).unwrap());
        assert!(!verify_password("654321", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same_password").unwrap();
        let second = hash_password("same_password").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("same_password", &first).unwrap());
        assert!(verify_password("same_password", &second).unwrap());
    }

    #[test]
    fn test_plaintext_is_not_a_hash() {
        let result = verify_password("123456", "123456");
        assert!(matches!(result, Err(CredentialError::MalformedHash)));
    }
}
