//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Document is not a JSON object or an update targets the wrong shape
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Unique field collision
    #[error("Duplicate value for {collection}.{field}: {value}")]
    Duplicate {
        collection: String,
        field: String,
        value: String,
    },

    /// Backend cannot be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidDocument(_) => "ATLAS_STORE_INVALID_DOCUMENT",
            StoreError::Duplicate { .. } => "ATLAS_STORE_DUPLICATE",
            StoreError::Unavailable(_) => "ATLAS_STORE_UNAVAILABLE",
            StoreError::Internal(_) => "ATLAS_STORE_INTERNAL",
        }
    }
}
