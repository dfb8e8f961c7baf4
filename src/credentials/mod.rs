//! # Credentials
//!
//! Password hashing and invitation reset tokens for user accounts.

mod crypto;
mod errors;

pub use crypto::{
    generate_token, hash_password, hash_token, verify_password, ResetToken,
    MIN_PASSWORD_LENGTH, RESET_TOKEN_TTL_HOURS,
};
pub use errors::{CredentialError, CredentialResult};
