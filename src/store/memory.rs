//! In-memory document store.
//!
//! Collections are vectors kept in insertion order; that order is what
//! callers see when a plan carries no sort. Guards are never held across an
//! `.await`.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::query::{compare_json_values, lookup, Filter, QueryPlan, SortOrder};

use super::{document_id, DocumentStore, StoreError, StoreResult, Update, ID_FIELD};

type Collections = HashMap<String, Vec<Value>>;

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
    /// collection -> unique fields
    unique: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce uniqueness of `field` within `collection`
    pub fn with_unique(mut self, collection: impl Into<String>, field: impl Into<String>) -> Self {
        self.unique
            .entry(collection.into())
            .or_default()
            .push(field.into());
        self
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))
    }

    fn check_unique(&self, collection: &str, docs: &[Value], candidate: &Value) -> StoreResult<()> {
        let Some(fields) = self.unique.get(collection) else {
            return Ok(());
        };
        let candidate_id = document_id(candidate);

        for field in fields {
            let Some(value) = candidate.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            let clash = docs
                .iter()
                .filter(|d| document_id(d) != candidate_id)
                .any(|d| d.get(field) == Some(value));
            if clash {
                return Err(StoreError::Duplicate {
                    collection: collection.to_string(),
                    field: field.clone(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn apply_update(doc: &mut Value, update: &Update) -> StoreResult<()> {
    let obj = doc
        .as_object_mut()
        .ok_or_else(|| StoreError::InvalidDocument("stored document is not an object".to_string()))?;

    match update {
        Update::Set(fields) => {
            for (key, value) in fields {
                if key != ID_FIELD {
                    obj.insert(key.clone(), value.clone());
                }
            }
        }
        Update::AddToSet { field, value } => {
            let entry = obj
                .entry(field.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            let items = entry.as_array_mut().ok_or_else(|| {
                StoreError::InvalidDocument(format!("'{}' is not an array", field))
            })?;
            if !items.contains(value) {
                items.push(value.clone());
            }
        }
        Update::Pull { field, value } => {
            if let Some(entry) = obj.get_mut(field) {
                let items = entry.as_array_mut().ok_or_else(|| {
                    StoreError::InvalidDocument(format!("'{}' is not an array", field))
                })?;
                items.retain(|item| item != value);
            }
        }
    }

    obj.insert("updatedAt".to_string(), now());
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, mut doc: Value) -> StoreResult<Value> {
        let obj = doc
            .as_object_mut()
            .ok_or_else(|| StoreError::InvalidDocument("document must be a JSON object".to_string()))?;

        match obj.get(ID_FIELD) {
            None => {
                obj.insert(ID_FIELD.to_string(), Value::String(Uuid::new_v4().to_string()));
            }
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(StoreError::InvalidDocument("_id must be a string".to_string()));
            }
        }
        let timestamp = now();
        obj.insert("createdAt".to_string(), timestamp.clone());
        obj.insert("updatedAt".to_string(), timestamp);

        let mut collections = self.write()?;
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(id) = document_id(&doc) {
            if docs.iter().any(|d| document_id(d) == Some(id)) {
                return Err(StoreError::Duplicate {
                    collection: collection.to_string(),
                    field: ID_FIELD.to_string(),
                    value: id.to_string(),
                });
            }
        }
        self.check_unique(collection, docs, &doc)?;

        docs.push(doc.clone());
        Ok(doc)
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| document_id(d) == Some(id)))
            .cloned())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)))
            .cloned())
    }

    async fn find(&self, collection: &str, plan: &QueryPlan) -> StoreResult<Vec<Value>> {
        let mut matched: Vec<Value> = {
            let collections = self.read()?;
            collections
                .get(collection)
                .map(|docs| docs.iter().filter(|d| plan.filter.matches(d)).cloned().collect())
                .unwrap_or_default()
        };

        if let Some(sort) = &plan.sort {
            matched.sort_by(|a, b| {
                let cmp = compare_json_values(lookup(a, &sort.field), lookup(b, &sort.field));
                match sort.order {
                    SortOrder::Asc => cmp,
                    SortOrder::Desc => cmp.reverse(),
                }
            });
        }

        let skip = usize::try_from(plan.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(plan.limit).unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|d| plan.projection.apply(d))
            .collect())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).count() as u64)
            .unwrap_or(0))
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        update: &Update,
    ) -> StoreResult<Option<Value>> {
        let mut collections = self.write()?;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let Some(index) = docs.iter().position(|d| document_id(d) == Some(id)) else {
            return Ok(None);
        };

        let mut updated = docs[index].clone();
        apply_update(&mut updated, update)?;
        self.check_unique(collection, docs, &updated)?;

        docs[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let mut collections = self.write()?;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        match docs.iter().position(|d| document_id(d) == Some(id)) {
            Some(index) => {
                docs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
