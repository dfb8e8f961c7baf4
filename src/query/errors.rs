//! # Query Errors
//!
//! Error types for request parsing, planning and plan execution.

use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query engine errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// A query string parameter could not be parsed or is not recognized
    #[error("Invalid query parameter: {0}")]
    InvalidParam(String),

    /// The structured filter uses an unsupported shape or operator
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Pagination arithmetic was asked to work with a zero page or limit
    #[error("Invalid pagination parameters: page={page}, limit={limit}")]
    InvalidPagination { page: u64, limit: u64 },

    /// The document store failed to run the plan
    #[error("Query execution failed: {0}")]
    Execution(String),
}

impl QueryError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidParam(_) => "ATLAS_QUERY_INVALID_PARAM",
            QueryError::InvalidFilter(_) => "ATLAS_QUERY_INVALID_FILTER",
            QueryError::InvalidPagination { .. } => "ATLAS_QUERY_INVALID_PAGINATION",
            QueryError::Execution(_) => "ATLAS_QUERY_EXECUTION_FAILED",
        }
    }

    /// True when the caller sent something malformed
    pub fn is_client_error(&self) -> bool {
        !matches!(self, QueryError::Execution(_))
    }
}
