//! # Plan Execution
//!
//! Runs a planned query against a [`DocumentStore`]: the page of documents
//! and the total match count are fetched concurrently, then wrapped in the
//! `{ data, meta }` envelope.

use serde_json::Value;
use tracing::debug;

use crate::observability::Event;
use crate::store::{DocumentStore, Relation, StoreError};

use super::errors::{QueryError, QueryResult};
use super::pagination::PaginationMeta;
use super::planner::plan;
use super::request::NormalizedQuery;
use super::response::Paginated;

impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        QueryError::Execution(err.to_string())
    }
}

/// Execute a normalized query against `collection`.
///
/// Any store failure aborts the whole call; no partial envelope is produced.
pub async fn execute<S>(
    store: &S,
    collection: &str,
    query: &NormalizedQuery,
    relations: &[Relation],
) -> QueryResult<Paginated<Value>>
where
    S: DocumentStore + ?Sized,
{
    let plan = plan(query);
    debug!(
        event = Event::QueryPlanned.as_str(),
        collection,
        skip = plan.skip,
        limit = plan.limit,
        filter = %plan.filter.to_document(),
        sort = %plan.sort_document(),
        projection = %plan.projection_document(),
    );

    let (docs, total) = tokio::try_join!(
        store.find(collection, &plan),
        store.count(collection, &plan.filter)
    )?;

    let docs = if relations.is_empty() {
        docs
    } else {
        store.expand(docs, relations).await?
    };

    let meta = PaginationMeta::compute(total, query.page, query.limit)?;
    debug!(
        event = Event::QueryExecuted.as_str(),
        collection,
        returned = docs.len(),
        total,
    );
    Ok(Paginated::new(docs, meta))
}
