//! Query planner
//!
//! Turns a normalized request into the plan a document store executes.
//! Planning is pure and deterministic: same query, same plan. Field names
//! are never checked against a collection; the store decides what exists.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::filter::{Filter, Predicate, StructuredFilter};
use super::pagination::skip_for;
use super::request::{NormalizedQuery, SortOrder};

/// Single-key ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

/// Which fields a store returns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Projection {
    /// Every field
    #[default]
    All,
    /// Only the named fields
    Include(BTreeSet<String>),
}

impl Projection {
    pub fn is_all(&self) -> bool {
        matches!(self, Projection::All)
    }

    /// Apply to a document. `_id` is always kept.
    pub fn apply(&self, doc: Value) -> Value {
        match (self, doc) {
            (Projection::Include(fields), Value::Object(obj)) => Value::Object(
                obj.into_iter()
                    .filter(|(k, _)| k == "_id" || fields.contains(k))
                    .collect(),
            ),
            (_, doc) => doc,
        }
    }
}

/// Immutable query plan (no runtime state)
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub filter: Filter,
    /// `None` leaves ordering to the store (unspecified)
    pub sort: Option<SortSpec>,
    pub projection: Projection,
    pub skip: u64,
    pub limit: u64,
}

impl QueryPlan {
    /// Sort in document-store form, `{field: 1 | -1}` or `{}`
    pub fn sort_document(&self) -> Value {
        let mut doc = Map::new();
        if let Some(sort) = &self.sort {
            let direction = match sort.order {
                SortOrder::Asc => 1,
                SortOrder::Desc => -1,
            };
            doc.insert(sort.field.clone(), Value::from(direction));
        }
        Value::Object(doc)
    }

    /// Projection in document-store form, `{field: 1, ...}` or `{}`
    pub fn projection_document(&self) -> Value {
        let mut doc = Map::new();
        if let Projection::Include(fields) = &self.projection {
            for field in fields {
                doc.insert(field.clone(), Value::from(1));
            }
        }
        Value::Object(doc)
    }
}

/// Plan a normalized query
pub fn plan(query: &NormalizedQuery) -> QueryPlan {
    QueryPlan {
        filter: compose_filter(&query.filter, query.search.as_deref(), &query.search_fields),
        sort: compose_sort(query.sort_by.as_deref(), query.sort_order),
        projection: compose_projection(&query.select),
        skip: skip_for(query.page, query.limit),
        limit: query.limit,
    }
}

/// Conjoin the structured filter with a disjunction of case-insensitive
/// substring matches, one per search field. Without a term or without
/// fields the search is dropped and the structured filter is returned
/// as an owned copy.
pub fn compose_filter(
    structured: &StructuredFilter,
    search: Option<&str>,
    search_fields: &[String],
) -> Filter {
    let filter = Filter::from_structured(structured);

    match search {
        Some(term) if !search_fields.is_empty() => filter.with_any(
            search_fields
                .iter()
                .map(|field| Predicate::contains(field.clone(), term))
                .collect(),
        ),
        _ => filter,
    }
}

pub fn compose_sort(sort_by: Option<&str>, order: SortOrder) -> Option<SortSpec> {
    sort_by.map(|field| match order {
        SortOrder::Asc => SortSpec::asc(field),
        SortOrder::Desc => SortSpec::desc(field),
    })
}

pub fn compose_projection(select: &[String]) -> Projection {
    if select.is_empty() {
        Projection::All
    } else {
        Projection::Include(select.iter().cloned().collect())
    }
}
