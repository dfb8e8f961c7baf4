//! # Query Engine
//!
//! Translates list-endpoint parameters into a storage-neutral query plan and
//! wraps results in a paginated envelope.
//!
//! Flow: query string -> [`QueryRequest`] -> [`NormalizedQuery`] ->
//! [`QueryPlan`] -> [`DocumentStore`](crate::store::DocumentStore) ->
//! [`Paginated`].

mod errors;
mod executor;
mod filter;
mod pagination;
mod planner;
mod request;
mod response;

pub use errors::{QueryError, QueryResult};
pub use executor::execute;
pub use filter::{
    compare_json_values, lookup, Condition, Filter, FilterOperator, Predicate, StructuredFilter,
    TextPattern,
};
pub use pagination::{skip_for, total_pages, PaginationMeta};
pub use planner::{
    compose_filter, compose_projection, compose_sort, plan, Projection, QueryPlan, SortSpec,
};
pub use request::{
    NormalizedQuery, PageLimits, QueryRequest, SortOrder, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT,
};
pub use response::Paginated;
