//! # Credential Errors

use thiserror::Error;

/// Result type for credential operations
pub type CredentialResult<T> = Result<T, CredentialError>;

/// Password and token errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CredentialError {
    /// Stored hash could not be parsed
    #[error("Stored password hash is malformed")]
    MalformedHash,

    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,
}

impl CredentialError {
    pub fn code(&self) -> &'static str {
        match self {
            CredentialError::MalformedHash => "ATLAS_CREDENTIAL_MALFORMED_HASH",
            CredentialError::HashingFailed => "ATLAS_CREDENTIAL_HASHING_FAILED",
        }
    }
}
