//! # Password and Token Hashing
//!
//! Passwords are stored only as Argon2id hashes. Reset tokens are handed to
//! the user raw and stored as a SHA-256 digest.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use super::errors::{CredentialError, CredentialResult};

/// Shortest accepted password
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Lifetime of an invitation reset token
pub const RESET_TOKEN_TTL_HOURS: i64 = 24;

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> CredentialResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| CredentialError::HashingFailed)
}

/// Verify a password against its stored hash
pub fn verify_password(password: &str, hash: &str) -> CredentialResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|_| CredentialError::MalformedHash)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// 256-bit random token, URL-safe base64
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 digest of a token, for storage
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// A freshly issued reset token
#[derive(Debug, Clone)]
pub struct ResetToken {
    /// Sent to the user, never stored
    pub raw: String,
    /// Stored on the user document
    pub hashed: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetToken {
    pub fn issue() -> Self {
        Self::issue_at(Utc::now())
    }

    pub fn issue_at(now: DateTime<Utc>) -> Self {
        let raw = generate_token();
        let hashed = hash_token(&raw);
        Self {
            raw,
            hashed,
            expires_at: now + Duration::hours(RESET_TOKEN_TTL_HOURS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("secure_password_123").unwrap();
        assert_ne!(hash, "secure_password_123");
        assert!(hash.starts_with("$argon2id$"));

        assert!(verify_password("secure_password_123", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same_password").unwrap();
        let b = hash_password("same_password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert_eq!(
            verify_password("x", "not-a-hash"),
            Err(CredentialError::MalformedHash)
        );
    }

    #[test]
    fn test_token_hashing() {
        let token = generate_token();
        assert_ne!(token, generate_token());
        assert!(token.len() >= 32);
        assert_eq!(hash_token(&token), hash_token(&token));
        assert_ne!(hash_token(&token), token);
    }

    #[test]
    fn test_reset_token_expiry() {
        let now = Utc::now();
        let token = ResetToken::issue_at(now);
        assert_eq!(token.hashed, hash_token(&token.raw));
        assert_eq!(token.expires_at - now, Duration::hours(24));
    }
}
