//! # Filter Expressions
//!
//! Comparison filters evaluated against serialized documents. Filters are
//! built by structural parsing of query parameters, never by rewriting
//! serialized text.

use std::cmp::Ordering;

use serde_json::Value;

/// Comparison operators accepted in `field[op]=value` parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl FilterOperator {
    /// Parse an operator token
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "eq" => Some(FilterOperator::Eq),
            "gt" => Some(FilterOperator::Gt),
            "gte" => Some(FilterOperator::Gte),
            "lt" => Some(FilterOperator::Lt),
            "lte" => Some(FilterOperator::Lte),
            "in" => Some(FilterOperator::In),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::In => "in",
        }
    }
}

/// A single filter on a document field
#[derive(Debug, Clone)]
pub struct FilterExpr {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl FilterExpr {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Check whether a document matches this filter
    pub fn matches(&self, doc: &Value) -> bool {
        let Some(field_value) = doc.get(&self.field) else {
            return false;
        };

        match self.operator {
            FilterOperator::Eq => match field_value {
                // Equality on a set-valued field means membership
                Value::Array(items) => items.iter().any(|item| values_equal(item, &self.value)),
                other => values_equal(other, &self.value),
            },
            FilterOperator::Gt => compare_values(field_value, &self.value) == Ordering::Greater,
            FilterOperator::Gte => compare_values(field_value, &self.value) != Ordering::Less,
            FilterOperator::Lt => compare_values(field_value, &self.value) == Ordering::Less,
            FilterOperator::Lte => compare_values(field_value, &self.value) != Ordering::Greater,
            FilterOperator::In => {
                let Some(candidates) = self.value.as_array() else {
                    return false;
                };
                let member = |item: &Value| candidates.iter().any(|c| values_equal(item, c));
                match field_value {
                    Value::Array(items) => items.iter().any(member),
                    other => member(other),
                }
            }
        }
    }
}

/// Equality that treats 8000 and 8000.0 as the same value; serde_json's own
/// `PartialEq` keeps integer and float representations distinct
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        _ => a == b,
    }
}

/// Rank for ordering across JSON types; comparison within a type is native
fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values, used for both filtering and sorting
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(0.0);
            let b = b.as_f64().unwrap_or(0.0);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Filters combined with AND logic
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    pub filters: Vec<FilterExpr>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, filter: FilterExpr) -> Self {
        self.filters.push(filter);
        self
    }

    /// Check whether a document matches every filter
    pub fn matches(&self, doc: &Value) -> bool {
        self.filters.iter().all(|filter| filter.matches(doc))
    }
}
