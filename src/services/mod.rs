//! # Services
//!
//! Business operations over the document store, one service per resource.
//! Services validate input, enforce references and uniqueness, and return
//! documents ready to serialize.

mod clients;
mod contact;
mod errors;
mod projects;
mod users;

pub use clients::ClientsService;
pub use contact::ContactService;
pub use errors::{ServiceError, ServiceResult};
pub use projects::ProjectsService;
pub use users::UsersService;

use serde::Serialize;
use serde_json::Value;

use crate::query::{NormalizedQuery, QueryError};
use crate::store::StoreError;

/// Serialize a record into a store document
fn to_document<T: Serialize>(record: &T) -> ServiceResult<Value> {
    match serde_json::to_value(record)? {
        doc @ Value::Object(_) => Ok(doc),
        _ => Err(ServiceError::Store(StoreError::InvalidDocument(
            "record did not serialize to an object".to_string(),
        ))),
    }
}

/// Remove fields callers must never see
fn strip_fields(mut doc: Value, fields: &[&str]) -> Value {
    if let Some(obj) = doc.as_object_mut() {
        for field in fields {
            obj.remove(*field);
        }
    }
    doc
}

/// Reject queries that filter, search or sort on hidden fields
fn reject_hidden_fields(query: &NormalizedQuery, hidden: &[&str]) -> ServiceResult<()> {
    let is_hidden = |field: &str| {
        let root = field.split('.').next().unwrap_or(field);
        hidden.contains(&root)
    };

    let referenced = query
        .filter
        .predicates()
        .iter()
        .map(|p| p.field.as_str())
        .chain(query.search_fields.iter().map(String::as_str))
        .chain(query.sort_by.as_deref());

    for field in referenced {
        if is_hidden(field) {
            return Err(QueryError::InvalidFilter(format!("field '{}' cannot be queried", field)).into());
        }
    }
    Ok(())
}
