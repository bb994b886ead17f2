//! Credential digests.
//!
//! Salted hashing for passwords and one-time tokens (account activation,
//! persistent login). Every digest kind goes through the same pair of
//! functions so the cost parameter stays globally consistent.
//!
//! # Examples
//!
//! ```
//! use microblog_common::digest::{hash_secret, verify_secret};
//!
//! let digest = hash_secret("foobar").expect("Failed to hash");
//! assert!(verify_secret("foobar", &digest).expect("Failed to verify"));
//! assert!(!verify_secret("barbaz", &digest).expect("Failed to verify"));
//! ```

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::{AppError, AppResult};

/// Hash a secret (password or token) with a fresh random salt.
///
/// Uses Argon2 with the library default parameters so passwords, activation
/// tokens, and remember tokens all share one cost setting.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if hashing fails.
pub fn hash_secret(secret: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(secret.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash secret: {e}")))
}

/// Verify a secret against a stored digest.
///
/// The underlying comparison runs in constant time relative to the secret
/// content.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the stored digest is malformed.
pub fn verify_secret(secret: &str, digest: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(digest)
        .map_err(|e| AppError::Internal(format!("Invalid digest: {e}")))?;

    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_secret() {
        let digest = hash_secret("test_password_123").unwrap();

        assert!(digest.starts_with("$argon2"));
        assert!(digest.len() > 50);
    }

    #[test]
    fn test_verify_secret_correct() {
        let digest = hash_secret("test_password_123").unwrap();

        assert!(verify_secret("test_password_123", &digest).unwrap());
    }

    #[test]
    fn test_verify_secret_incorrect() {
        let digest = hash_secret("test_password_123").unwrap();

        assert!(!verify_secret("wrong_password", &digest).unwrap());
    }

    #[test]
    fn test_verify_secret_invalid_digest() {
        let result = verify_secret("test", "not_a_digest");
        assert!(result.is_err());
    }

    #[test]
    fn test_hash_secret_different_each_time() {
        let digest1 = hash_secret("same_secret").unwrap();
        let digest2 = hash_secret("same_secret").unwrap();

        // Different salts should produce different digests
        assert_ne!(digest1, digest2);

        // But both should verify correctly
        assert!(verify_secret("same_secret", &digest1).unwrap());
        assert!(verify_secret("same_secret", &digest2).unwrap());
    }

    #[test]
    fn test_empty_secret_roundtrip() {
        let digest = hash_secret("").unwrap();

        assert!(verify_secret("", &digest).unwrap());
        assert!(!verify_secret("x", &digest).unwrap());
    }
}
