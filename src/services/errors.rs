//! # Service Errors

use thiserror::Error;

use crate::credentials::CredentialError;
use crate::models::ValidationErrors;
use crate::query::QueryError;
use crate::store::StoreError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    // ==================
    // Caller Errors
    // ==================
    /// Request body failed field checks
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{0}")]
    NotFound(String),

    /// Unique value already taken
    #[error("{0}")]
    Conflict(String),

    /// Bad query parameters, or a store failure while listing
    #[error(transparent)]
    Query(#[from] QueryError),

    // ==================
    // Internal Errors
    // ==================
    #[error(transparent)]
    Store(StoreError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Stored document does not have the expected shape
    #[error("Malformed document: {0}")]
    Malformed(String),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "ATLAS_SERVICE_VALIDATION_FAILED",
            ServiceError::NotFound(_) => "ATLAS_SERVICE_NOT_FOUND",
            ServiceError::Conflict(_) => "ATLAS_SERVICE_CONFLICT",
            ServiceError::Query(e) => e.code(),
            ServiceError::Store(e) => e.code(),
            ServiceError::Credential(e) => e.code(),
            ServiceError::Malformed(_) => "ATLAS_SERVICE_MALFORMED_DOCUMENT",
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field, .. } if field == "email" => {
                ServiceError::Conflict("Email already exists".to_string())
            }
            StoreError::Duplicate { field, value, .. } => {
                ServiceError::Conflict(format!("{} '{}' already exists", field, value))
            }
            other => ServiceError::Store(other),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Malformed(err.to_string())
    }
}
