//! # Notification Errors

use thiserror::Error;

/// Result type for outbound email
pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotifyError {
    /// Sender or recipient is not a mailbox
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build email: {0}")]
    Build(String),

    /// SMTP relay refused or could not be reached
    #[error("Failed to send email: {0}")]
    Transport(String),
}

impl NotifyError {
    pub fn code(&self) -> &'static str {
        match self {
            NotifyError::InvalidAddress(_) => "ATLAS_NOTIFY_INVALID_ADDRESS",
            NotifyError::Build(_) => "ATLAS_NOTIFY_BUILD_FAILED",
            NotifyError::Transport(_) => "ATLAS_NOTIFY_TRANSPORT_FAILED",
        }
    }
}
