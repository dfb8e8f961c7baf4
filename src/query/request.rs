//! # Query Request
//!
//! Parses list-endpoint query strings into a [`QueryRequest`] and normalizes
//! it into a [`NormalizedQuery`] before planning.
//!
//! Accepted parameters:
//! - `page`, `limit`: integers
//! - `sortBy`, `sortOrder` (`asc` | `desc`)
//! - `search`, `searchFields` (repeated and/or comma-joined)
//! - `select` (repeated and/or comma-joined)
//! - `filter` as a JSON object, or `filter[field]=value` / `filter[field][$op]=value`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{QueryError, QueryResult};
use super::filter::StructuredFilter;

/// Page used when the request has none
pub const DEFAULT_PAGE: u64 = 1;

/// Limit used when the request has none
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest page size served
pub const MAX_LIMIT: u64 = 100;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> QueryResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(QueryError::InvalidParam(format!(
                "sortOrder must be 'asc' or 'desc', got '{}'",
                other
            ))),
        }
    }
}

/// Page size bounds applied during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    #[serde(default = "default_limit")]
    pub default_limit: u64,

    #[serde(default = "max_limit")]
    pub max_limit: u64,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

fn max_limit() -> u64 {
    MAX_LIMIT
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: max_limit(),
        }
    }
}

/// Caller-supplied query intent. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub search: Option<String>,
    pub search_fields: Option<Vec<String>>,
    pub select: Option<Vec<String>>,
    pub filter: Option<StructuredFilter>,
}

impl QueryRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = Some(order);
        self
    }

    pub fn with_search<I, S>(mut self, term: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search = Some(term.into());
        self.search_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_filter(mut self, filter: StructuredFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Parse decoded query-string pairs. Unknown parameters are rejected.
    pub fn from_pairs<I, K, V>(pairs: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = QueryRequest::default();
        let mut raw_filter = Map::new();

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "page" => request.page = Some(parse_integer("page", value)?),
                "limit" => request.limit = Some(parse_integer("limit", value)?),
                "sortBy" => request.sort_by = non_blank(value),
                "sortOrder" => request.sort_order = Some(SortOrder::parse(value)?),
                "search" => request.search = non_blank(value),
                "searchFields" | "searchFields[]" => push_list(&mut request.search_fields, value),
                "select" | "select[]" => push_list(&mut request.select, value),
                "filter" => merge_json_filter(&mut raw_filter, value)?,
                _ => match key.strip_prefix("filter[") {
                    Some(path) => merge_bracket_filter(&mut raw_filter, path, value)?,
                    None => {
                        return Err(QueryError::InvalidParam(format!(
                            "unknown parameter '{}'",
                            key
                        )))
                    }
                },
            }
        }

        if !raw_filter.is_empty() {
            request.filter = Some(StructuredFilter::from_json(&Value::Object(raw_filter))?);
        }

        Ok(request)
    }

    /// Apply defaults and bounds. The result always has `page >= 1` and
    /// `1 <= limit <= limits.max_limit`.
    pub fn normalize(&self, limits: &PageLimits) -> NormalizedQuery {
        let max = limits.max_limit.max(1);
        let page = self.page.map_or(DEFAULT_PAGE, |p| p.max(1) as u64);
        let limit = self
            .limit
            .map_or(limits.default_limit, |l| l.max(1) as u64)
            .clamp(1, max);

        let search = self.search.as_deref().and_then(non_blank);
        let search_fields = self
            .search_fields
            .iter()
            .flatten()
            .filter(|f| !f.trim().is_empty())
            .cloned()
            .collect();
        let select = self
            .select
            .iter()
            .flatten()
            .filter(|f| !f.trim().is_empty())
            .cloned()
            .collect();

        NormalizedQuery {
            page,
            limit,
            sort_by: self.sort_by.as_deref().and_then(non_blank),
            sort_order: self.sort_order.unwrap_or_default(),
            search,
            search_fields,
            select,
            filter: self.filter.clone().unwrap_or_default(),
        }
    }
}

/// A request with every default applied
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuery {
    pub page: u64,
    pub limit: u64,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    pub search: Option<String>,
    pub search_fields: Vec<String>,
    pub select: Vec<String>,
    pub filter: StructuredFilter,
}

impl Default for NormalizedQuery {
    fn default() -> Self {
        QueryRequest::default().normalize(&PageLimits::default())
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_integer(name: &str, value: &str) -> QueryResult<i64> {
    value.trim().parse().map_err(|_| {
        QueryError::InvalidParam(format!("{} must be an integer, got '{}'", name, value))
    })
}

fn push_list(target: &mut Option<Vec<String>>, value: &str) {
    let items = target.get_or_insert_with(Vec::new);
    items.extend(
        value
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from),
    );
}

fn merge_json_filter(target: &mut Map<String, Value>, value: &str) -> QueryResult<()> {
    let parsed: Value = serde_json::from_str(value)
        .map_err(|e| QueryError::InvalidFilter(format!("filter is not valid JSON: {}", e)))?;
    match parsed {
        Value::Object(obj) => {
            target.extend(obj);
            Ok(())
        }
        _ => Err(QueryError::InvalidFilter(
            "filter must be a JSON object".to_string(),
        )),
    }
}

/// `path` is what follows `filter[`, e.g. `status]` or `age][$gte]`
fn merge_bracket_filter(
    target: &mut Map<String, Value>,
    path: &str,
    value: &str,
) -> QueryResult<()> {
    let segments: Vec<&str> = path
        .strip_suffix(']')
        .map(|inner| inner.split("][").collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [field] if !field.is_empty() => {
            target.insert(field.to_string(), bracket_value(None, value));
            Ok(())
        }
        [field, op] if !field.is_empty() && !op.is_empty() => {
            let entry = target
                .entry(field.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match entry {
                Value::Object(ops) => {
                    ops.insert(op.to_string(), bracket_value(Some(*op), value));
                    Ok(())
                }
                _ => Err(QueryError::InvalidFilter(format!(
                    "'{}' has both an equality and an operator condition",
                    field
                ))),
            }
        }
        _ => Err(QueryError::InvalidParam(format!(
            "malformed filter parameter 'filter[{}'",
            path
        ))),
    }
}

/// Bracket-form values stay strings; typed operands go through `filter=`.
/// `(a,b,c)` is a list and `$exists` takes `true`/`false`.
fn bracket_value(op: Option<&str>, value: &str) -> Value {
    if op == Some("$exists") {
        return match value {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            other => Value::String(other.to_string()),
        };
    }

    if value.starts_with('(') && value.ends_with(')') && value.len() >= 2 {
        let items = value[1..value.len() - 1]
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Value::String(s.to_string()))
            .collect();
        return Value::Array(items);
    }

    Value::String(value.to_string())
}
