//! # Filter Expressions
//!
//! The structured filter a caller supplies, the text-search conditions built
//! from `search`/`searchFields`, and the composed predicate the document
//! store evaluates.
//!
//! Structured filters are restricted to a flat map of field to equality or
//! comparison operators. Boolean operators, nested documents and any
//! operator outside [`FilterOperator`] are rejected when the filter is parsed.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::errors::{QueryError, QueryResult};

/// Comparison operators accepted in a structured filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterOperator {
    /// Equals
    Eq,
    /// Not equals
    Ne,
    /// Greater than
    Gt,
    /// Greater than or equal
    Gte,
    /// Less than
    Lt,
    /// Less than or equal
    Lte,
    /// Value in list
    In,
    /// Value not in list
    Nin,
    /// Field present / absent
    Exists,
}

impl FilterOperator {
    /// Wire form of the operator
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "$eq",
            FilterOperator::Ne => "$ne",
            FilterOperator::Gt => "$gt",
            FilterOperator::Gte => "$gte",
            FilterOperator::Lt => "$lt",
            FilterOperator::Lte => "$lte",
            FilterOperator::In => "$in",
            FilterOperator::Nin => "$nin",
            FilterOperator::Exists => "$exists",
        }
    }

    /// Parse the wire form. Unknown operators yield `None`.
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "$eq" => Some(FilterOperator::Eq),
            "$ne" => Some(FilterOperator::Ne),
            "$gt" => Some(FilterOperator::Gt),
            "$gte" => Some(FilterOperator::Gte),
            "$lt" => Some(FilterOperator::Lt),
            "$lte" => Some(FilterOperator::Lte),
            "$in" => Some(FilterOperator::In),
            "$nin" => Some(FilterOperator::Nin),
            "$exists" => Some(FilterOperator::Exists),
            _ => None,
        }
    }

    fn check_operand(&self, field: &str, operand: &Value) -> QueryResult<()> {
        let ok = match self {
            FilterOperator::Eq | FilterOperator::Ne => !operand.is_object(),
            FilterOperator::Gt | FilterOperator::Gte | FilterOperator::Lt | FilterOperator::Lte => {
                operand.is_number() || operand.is_string()
            }
            FilterOperator::In | FilterOperator::Nin => operand
                .as_array()
                .is_some_and(|items| items.iter().all(|item| !item.is_object())),
            FilterOperator::Exists => operand.is_boolean(),
        };

        if ok {
            Ok(())
        } else {
            Err(QueryError::InvalidFilter(format!(
                "invalid operand for {} on '{}'",
                self.as_str(),
                field
            )))
        }
    }
}

/// Case-insensitive literal substring match.
///
/// The term is never interpreted as a pattern language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPattern {
    term: String,
    needle: String,
}

impl TextPattern {
    pub fn new(term: impl Into<String>) -> Self {
        let term = term.into();
        let needle = term.to_lowercase();
        Self { term, needle }
    }

    pub fn matches(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }

    fn to_document(&self) -> Value {
        let mut cond = Map::new();
        cond.insert("$regex".to_string(), Value::String(regex::escape(&self.term)));
        cond.insert("$options".to_string(), Value::String("i".to_string()));
        Value::Object(cond)
    }
}

/// What a predicate requires of its field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Operator comparison against a JSON operand
    Compare(FilterOperator, Value),
    /// Text search
    Contains(TextPattern),
}

/// A single field condition
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Field name, dotted for embedded fields
    pub field: String,
    pub condition: Condition,
}

impl Predicate {
    pub fn compare(field: impl Into<String>, op: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            condition: Condition::Compare(op, value),
        }
    }

    /// Create an equality predicate
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::compare(field, FilterOperator::Eq, value)
    }

    /// Create a case-insensitive substring predicate
    pub fn contains(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            condition: Condition::Contains(TextPattern::new(term)),
        }
    }

    /// Check if a document satisfies this predicate
    pub fn matches(&self, doc: &Value) -> bool {
        let value = lookup(doc, &self.field);
        match &self.condition {
            Condition::Contains(pattern) => match value {
                Some(Value::String(s)) => pattern.matches(s),
                Some(Value::Array(items)) => items
                    .iter()
                    .any(|item| item.as_str().is_some_and(|s| pattern.matches(s))),
                _ => false,
            },
            Condition::Compare(op, operand) => compare(value, *op, operand),
        }
    }
}

/// Caller-supplied structured filter: a conjunction of field predicates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredFilter {
    predicates: Vec<Predicate>,
}

impl StructuredFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Parse a filter object such as
    /// `{"status": "active", "age": {"$gte": 18, "$lt": 65}}`.
    pub fn from_json(value: &Value) -> QueryResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| QueryError::InvalidFilter("filter must be a JSON object".to_string()))?;

        let mut filter = StructuredFilter::new();
        for (field, spec) in obj {
            if field.is_empty() {
                return Err(QueryError::InvalidFilter("empty field name".to_string()));
            }
            if field.starts_with('$') {
                return Err(QueryError::InvalidFilter(format!(
                    "top-level operator '{}' is not supported",
                    field
                )));
            }

            match spec {
                Value::Object(ops) => {
                    if ops.is_empty() {
                        return Err(QueryError::InvalidFilter(format!(
                            "empty condition for '{}'",
                            field
                        )));
                    }
                    if !ops.keys().all(|k| k.starts_with('$')) {
                        return Err(QueryError::InvalidFilter(format!(
                            "nested documents are not supported for '{}', use a dotted path",
                            field
                        )));
                    }
                    for (key, operand) in ops {
                        let op = FilterOperator::parse(key).ok_or_else(|| {
                            QueryError::InvalidFilter(format!("unsupported operator '{}'", key))
                        })?;
                        op.check_operand(field, operand)?;
                        filter.predicates.push(Predicate::compare(field.clone(), op, operand.clone()));
                    }
                }
                other => filter.predicates.push(Predicate::eq(field.clone(), other.clone())),
            }
        }

        Ok(filter)
    }
}

/// Composed predicate: every `all` predicate holds, and at least one `any`
/// predicate holds when `any` is non-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    all: Vec<Predicate>,
    any: Vec<Predicate>,
}

impl Filter {
    /// The always-true predicate
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Owned copy of a structured filter
    pub fn from_structured(structured: &StructuredFilter) -> Self {
        Self {
            all: structured.predicates.clone(),
            any: Vec::new(),
        }
    }

    /// Conjoin a disjunction with this filter
    pub fn with_any(mut self, any: Vec<Predicate>) -> Self {
        self.any = any;
        self
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.all.push(predicate);
        self
    }

    pub fn all(&self) -> &[Predicate] {
        &self.all
    }

    pub fn any(&self) -> &[Predicate] {
        &self.any
    }

    pub fn is_match_all(&self) -> bool {
        self.all.is_empty() && self.any.is_empty()
    }

    /// Check if a document matches this filter
    pub fn matches(&self, doc: &Value) -> bool {
        self.all.iter().all(|p| p.matches(doc))
            && (self.any.is_empty() || self.any.iter().any(|p| p.matches(doc)))
    }

    /// Render in document-store query form:
    /// `{"field": {"$op": value}, "$or": [{"name": {"$regex": "..", "$options": "i"}}]}`
    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        for predicate in &self.all {
            let entry = doc
                .entry(predicate.field.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let (Value::Object(target), Value::Object(cond)) = (entry, condition_document(&predicate.condition)) {
                target.extend(cond);
            }
        }

        if !self.any.is_empty() {
            let branches = self
                .any
                .iter()
                .map(|p| {
                    let mut branch = Map::new();
                    branch.insert(p.field.clone(), condition_document(&p.condition));
                    Value::Object(branch)
                })
                .collect();
            doc.insert("$or".to_string(), Value::Array(branches));
        }

        Value::Object(doc)
    }
}

fn condition_document(condition: &Condition) -> Value {
    match condition {
        Condition::Compare(op, operand) => {
            let mut cond = Map::new();
            cond.insert(op.as_str().to_string(), operand.clone());
            Value::Object(cond)
        }
        Condition::Contains(pattern) => pattern.to_document(),
    }
}

/// Resolve a dotted field path inside a document
pub fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |current, segment| current.get(segment))
}

fn compare(value: Option<&Value>, op: FilterOperator, operand: &Value) -> bool {
    match op {
        FilterOperator::Eq => equals(value, operand),
        FilterOperator::Ne => !equals(value, operand),
        FilterOperator::Gt => ordered(value, operand, |o| o == Ordering::Greater),
        FilterOperator::Gte => ordered(value, operand, |o| o != Ordering::Less),
        FilterOperator::Lt => ordered(value, operand, |o| o == Ordering::Less),
        FilterOperator::Lte => ordered(value, operand, |o| o != Ordering::Greater),
        FilterOperator::In => in_list(value, operand),
        FilterOperator::Nin => !in_list(value, operand),
        FilterOperator::Exists => operand.as_bool().unwrap_or(true) == value.is_some(),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => a == b,
    }
}

fn equals(value: Option<&Value>, operand: &Value) -> bool {
    match value {
        None => operand.is_null(),
        Some(Value::Array(items)) if !operand.is_array() => {
            items.iter().any(|item| values_equal(item, operand))
        }
        Some(v) => values_equal(v, operand),
    }
}

fn in_list(value: Option<&Value>, operand: &Value) -> bool {
    operand
        .as_array()
        .is_some_and(|candidates| candidates.iter().any(|c| equals(value, c)))
}

fn ordered(value: Option<&Value>, operand: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| partial_compare(item, operand).is_some_and(&accept)),
        Some(v) => partial_compare(v, operand).is_some_and(accept),
        None => false,
    }
}

/// Ordering between two values of the same kind
fn partial_compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Total order used for sorting. Missing and null sort first, then booleans,
/// numbers, strings, arrays and objects.
pub fn compare_json_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(x), Some(y)) if rank(a) == rank(b) => {
            partial_compare(x, y).unwrap_or(Ordering::Equal)
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_equality_and_operators() {
        let filter = StructuredFilter::from_json(&json!({
            "status": "active",
            "age": {"$gte": 18, "$lt": 65}
        }))
        .unwrap();

        assert_eq!(filter.predicates().len(), 3);
        assert!(filter
            .predicates()
            .contains(&Predicate::eq("status", json!("active"))));
        assert!(filter
            .predicates()
            .contains(&Predicate::compare("age", FilterOperator::Gte, json!(18))));
    }

    #[test]
    fn test_parse_rejects_unknown_operator() {
        let err = StructuredFilter::from_json(&json!({"name": {"$where": "1"}})).unwrap_err();
        assert!(matches!(err, QueryError::InvalidFilter(_)));
    }

    #[test]
    fn test_parse_rejects_top_level_or() {
        let err = StructuredFilter::from_json(&json!({"$or": [{"a": 1}]})).unwrap_err();
        assert!(matches!(err, QueryError::InvalidFilter(_)));
    }

    #[test]
    fn test_parse_rejects_nested_document() {
        assert!(StructuredFilter::from_json(&json!({"address": {"city": "Oslo"}})).is_err());
        assert!(StructuredFilter::from_json(&json!({"age": {}})).is_err());
    }

    #[test]
    fn test_parse_checks_operands() {
        assert!(StructuredFilter::from_json(&json!({"role": {"$in": "admin"}})).is_err());
        assert!(StructuredFilter::from_json(&json!({"phone": {"$exists": 1}})).is_err());
        assert!(StructuredFilter::from_json(&json!({"age": {"$gt": [1]}})).is_err());
        assert!(StructuredFilter::from_json(&json!({"role": {"$in": ["qa", "admin"]}})).is_ok());
    }

    #[test]
    fn test_parse_requires_object() {
        assert!(StructuredFilter::from_json(&json!(["status"])).is_err());
    }

    #[test]
    fn test_comparison_matching() {
        let doc = json!({"age": 30, "name": "Ada", "tags": ["a", "b"]});

        assert!(Predicate::compare("age", FilterOperator::Gt, json!(18)).matches(&doc));
        assert!(!Predicate::compare("age", FilterOperator::Lt, json!(30)).matches(&doc));
        assert!(Predicate::compare("age", FilterOperator::Lte, json!(30.0)).matches(&doc));
        assert!(Predicate::eq("age", json!(30.0)).matches(&doc));
        assert!(Predicate::compare("name", FilterOperator::Ne, json!("Bob")).matches(&doc));
        assert!(Predicate::eq("tags", json!("b")).matches(&doc));
        assert!(Predicate::compare("name", FilterOperator::In, json!(["Ada", "Bob"])).matches(&doc));
        assert!(Predicate::compare("name", FilterOperator::Nin, json!(["Bob"])).matches(&doc));
    }

    #[test]
    fn test_missing_field_semantics() {
        let doc = json!({"name": "Ada"});

        assert!(Predicate::eq("phone", Value::Null).matches(&doc));
        assert!(!Predicate::compare("age", FilterOperator::Gt, json!(1)).matches(&doc));
        assert!(Predicate::compare("phone", FilterOperator::Exists, json!(false)).matches(&doc));
        assert!(!Predicate::compare("phone", FilterOperator::Exists, json!(true)).matches(&doc));
    }

    #[test]
    fn test_dotted_path_lookup() {
        let doc = json!({"customFields": {"tier": "gold"}});
        assert!(Predicate::eq("customFields.tier", json!("gold")).matches(&doc));
        assert_eq!(lookup(&doc, "customFields.missing"), None);
    }

    #[test]
    fn test_contains_is_case_insensitive_and_literal() {
        let predicate = Predicate::contains("name", "ACME");
        assert!(predicate.matches(&json!({"name": "Acme Corporation"})));
        assert!(!predicate.matches(&json!({"name": "Globex"})));
        assert!(!predicate.matches(&json!({"name": 42})));

        let literal = Predicate::contains("email", "a.c");
        assert!(literal.matches(&json!({"email": "ma.co@example.com"})));
        assert!(!literal.matches(&json!({"email": "abc@example.com"})));
    }

    #[test]
    fn test_filter_all_and_any() {
        let filter = Filter::match_all()
            .and(Predicate::eq("isActive", json!(true)))
            .with_any(vec![
                Predicate::contains("name", "acme"),
                Predicate::contains("email", "acme"),
            ]);

        assert!(filter.matches(&json!({"isActive": true, "name": "x", "email": "hi@acme.io"})));
        assert!(!filter.matches(&json!({"isActive": false, "name": "Acme"})));
        assert!(!filter.matches(&json!({"isActive": true, "name": "Globex"})));
    }

    #[test]
    fn test_match_all() {
        let filter = Filter::match_all();
        assert!(filter.is_match_all());
        assert!(filter.matches(&json!({})));
        assert_eq!(filter.to_document(), json!({}));
    }

    #[test]
    fn test_to_document() {
        let filter = Filter::match_all()
            .and(Predicate::compare("age", FilterOperator::Gte, json!(18)))
            .and(Predicate::compare("age", FilterOperator::Lt, json!(65)))
            .with_any(vec![Predicate::contains("name", "a+b")]);

        assert_eq!(
            filter.to_document(),
            json!({
                "age": {"$gte": 18, "$lt": 65},
                "$or": [{"name": {"$regex": "a\\+b", "$options": "i"}}]
            })
        );
    }

    #[test]
    fn test_sort_ordering() {
        assert_eq!(compare_json_values(None, Some(&json!(1))), Ordering::Less);
        assert_eq!(compare_json_values(Some(&json!(2)), Some(&json!(10))), Ordering::Less);
        assert_eq!(compare_json_values(Some(&json!("b")), Some(&json!("a"))), Ordering::Greater);
        assert_eq!(compare_json_values(Some(&json!(5)), Some(&json!("a"))), Ordering::Less);
        assert_eq!(compare_json_values(Some(&Value::Null), None), Ordering::Equal);
    }
}
