//! # Pagination
//!
//! Offset arithmetic and page metadata.

use serde::{Deserialize, Serialize};

use super::errors::{QueryError, QueryResult};

/// Number of documents to skip for a 1-based page
pub fn skip_for(page: u64, limit: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(limit)
}

/// Number of pages needed for `total` items
pub fn total_pages(total: u64, limit: u64) -> QueryResult<u64> {
    if limit == 0 {
        return Err(QueryError::InvalidPagination { page: 0, limit });
    }
    Ok(total.div_ceil(limit))
}

/// Page metadata returned alongside every list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PaginationMeta {
    /// Build metadata once the total match count is known.
    ///
    /// `page` and `limit` must both be at least 1. Normalized queries
    /// always satisfy this; direct callers get `InvalidPagination`.
    pub fn compute(total: u64, page: u64, limit: u64) -> QueryResult<Self> {
        if page == 0 || limit == 0 {
            return Err(QueryError::InvalidPagination { page, limit });
        }

        let total_pages = total_pages(total, limit)?;
        let (has_next_page, has_previous_page) = if total_pages == 0 {
            (false, false)
        } else {
            (page < total_pages, page > 1)
        };

        Ok(Self {
            total,
            page,
            limit,
            total_pages,
            has_next_page,
            has_previous_page,
        })
    }
}
