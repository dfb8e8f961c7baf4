//! # Response Envelope
//!
//! `{ data, meta }` payload returned by every list endpoint.

use serde::{Deserialize, Serialize};

use super::pagination::PaginationMeta;

/// List response with pagination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, meta: PaginationMeta) -> Self {
        Self { data, meta }
    }

    /// Convert every item, keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_serialization() {
        let meta = PaginationMeta::compute(2, 1, 10).unwrap();
        let response = Paginated::new(vec![json!({"_id": "1"}), json!({"_id": "2"})], meta);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
        assert_eq!(json["meta"]["total"], 2);
        assert_eq!(json["meta"]["totalPages"], 1);
    }

    #[test]
    fn test_map_keeps_meta() {
        let meta = PaginationMeta::compute(12, 2, 5).unwrap();
        let response = Paginated::new(vec!["a", "bb"], meta);

        let mapped = response.map(str::len);
        assert_eq!(mapped.data, vec![1, 2]);
        assert_eq!(mapped.meta, meta);
    }
}
