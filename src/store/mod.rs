//! # Document Store
//!
//! The persistence collaborator. A store executes [`QueryPlan`]s produced by
//! the planner, counts matches for a [`Filter`], and performs by-id CRUD.
//! Documents are JSON objects carrying a string `_id`.

mod errors;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::query::{Filter, QueryPlan};

/// Field holding a document's identifier
pub const ID_FIELD: &str = "_id";

/// Read a document's identifier
pub fn document_id(doc: &Value) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str)
}

/// Modification applied by [`DocumentStore::update_by_id`]
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Overwrite the given fields
    Set(Map<String, Value>),
    /// Append to an array field unless already present
    AddToSet { field: String, value: Value },
    /// Remove every occurrence from an array field
    Pull { field: String, value: Value },
}

/// A reference field to expand into the referenced documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Field holding an id or an array of ids
    pub field: String,
    /// Collection the ids point into
    pub collection: String,
    /// Fields removed from expanded documents
    pub hidden: Vec<String>,
}

impl Relation {
    pub fn new(field: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            collection: collection.into(),
            hidden: Vec::new(),
        }
    }

    pub fn hiding(mut self, fields: &[&str]) -> Self {
        self.hidden.extend(fields.iter().map(|f| f.to_string()));
        self
    }

    fn strip(&self, mut doc: Value) -> Value {
        if let Some(obj) = doc.as_object_mut() {
            for field in &self.hidden {
                obj.remove(field);
            }
        }
        doc
    }
}

/// Document store trait
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, assigning `_id`, `createdAt` and `updatedAt`
    async fn insert(&self, collection: &str, doc: Value) -> StoreResult<Value>;

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// First document matching `filter`, in store order
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>>;

    /// Documents matching the plan, honoring sort, skip, limit and projection
    async fn find(&self, collection: &str, plan: &QueryPlan) -> StoreResult<Vec<Value>>;

    /// Matches for `filter`, ignoring skip, limit and projection
    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    /// Apply an update and return the new document, `None` if no such id
    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        update: &Update,
    ) -> StoreResult<Option<Value>>;

    /// Returns false if no such id
    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<bool>;

    /// Replace reference ids with the referenced documents.
    ///
    /// A single id that resolves to nothing becomes `null`; unresolved ids
    /// inside an array are dropped. Fields that already hold documents are
    /// left alone.
    async fn expand(&self, docs: Vec<Value>, relations: &[Relation]) -> StoreResult<Vec<Value>> {
        let mut expanded = Vec::with_capacity(docs.len());

        for mut doc in docs {
            for relation in relations {
                let Some(obj) = doc.as_object_mut() else {
                    break;
                };

                let resolved = match obj.get(&relation.field) {
                    Some(Value::String(id)) => {
                        let id = id.clone();
                        self.find_by_id(&relation.collection, &id)
                            .await?
                            .map(|d| relation.strip(d))
                            .unwrap_or(Value::Null)
                    }
                    Some(Value::Array(ids)) if ids.iter().all(Value::is_string) => {
                        let ids: Vec<String> = ids
                            .iter()
                            .filter_map(|v| v.as_str().map(String::from))
                            .collect();
                        let mut items = Vec::with_capacity(ids.len());
                        for id in ids {
                            if let Some(found) = self.find_by_id(&relation.collection, &id).await? {
                                items.push(relation.strip(found));
                            }
                        }
                        Value::Array(items)
                    }
                    _ => continue,
                };

                obj.insert(relation.field.clone(), resolved);
            }
            expanded.push(doc);
        }

        Ok(expanded)
    }
}
