//! # List Parameter Parsing
//!
//! Translates a request's query string into a structured list query.
//! `select`, `sort`, `page`, and `limit` are reserved; every other key is a
//! filter, either `field=value` equality or `field[op]=value` comparison.

use std::collections::HashMap;

use serde_json::Value;

use super::errors::{QueryError, QueryResult};
use super::filter::{FilterExpr, FilterOperator, FilterSet};

/// Default page size
pub const DEFAULT_LIMIT: usize = 25;

/// A sort key with direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub ascending: bool,
}

/// Parsed list parameters
#[derive(Debug, Clone)]
pub struct ListParams {
    /// Fields to keep in the response (None = all); the id field is always
    /// kept
    pub select: Option<Vec<String>>,

    /// Sort keys, left to right priority
    pub sort: Vec<SortKey>,

    /// 1-based page number
    pub page: usize,

    /// Page size
    pub limit: usize,

    /// Field filters
    pub filters: FilterSet,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            select: None,
            sort: vec![SortKey {
                field: "createdAt".to_string(),
                ascending: false,
            }],
            page: 1,
            limit: DEFAULT_LIMIT,
            filters: FilterSet::new(),
        }
    }
}

impl ListParams {
    /// Parse query parameters into a list query
    pub fn parse(params: &HashMap<String, String>) -> QueryResult<Self> {
        let mut result = ListParams::default();

        for (key, value) in params {
            match key.as_str() {
                "select" => {
                    result.select = Some(parse_select(value)?);
                }
                "sort" => {
                    result.sort = parse_sort(value);
                }
                "page" => {
                    result.page = parse_page(value)?;
                }
                "limit" => {
                    result.limit = parse_limit(value)?;
                }
                _ => {
                    result.filters.filters.push(parse_filter(key, value)?);
                }
            }
        }

        Ok(result)
    }

    /// Pin an extra equality filter, used to scope nested routes to their
    /// parent resource
    pub fn scope(mut self, field: &str, value: Value) -> Self {
        self.filters
            .filters
            .push(FilterExpr::new(field, FilterOperator::Eq, value));
        self
    }
}

/// Comma-separated field list
fn parse_select(value: &str) -> QueryResult<Vec<String>> {
    let fields: Vec<String> = value
        .split(',')
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty())
        .collect();

    if fields.is_empty() {
        return Err(QueryError::InvalidParam(
            "select cannot be empty".to_string(),
        ));
    }

    Ok(fields)
}

/// Comma-separated sort keys, `-` prefix for descending
fn parse_sort(value: &str) -> Vec<SortKey> {
    let keys: Vec<SortKey> = value
        .split(',')
        .map(|key| key.trim())
        .filter(|key| !key.is_empty())
        .map(|key| match key.strip_prefix('-') {
            Some(field) => SortKey {
                field: field.to_string(),
                ascending: false,
            },
            None => SortKey {
                field: key.to_string(),
                ascending: true,
            },
        })
        .collect();

    if keys.is_empty() {
        ListParams::default().sort
    } else {
        keys
    }
}

/// 1-based page number; values below 1 clamp to 1
fn parse_page(value: &str) -> QueryResult<usize> {
    let page: i64 = value
        .parse()
        .map_err(|_| QueryError::InvalidParam(format!("Invalid page: {}", value)))?;
    Ok(page.max(1) as usize)
}

fn parse_limit(value: &str) -> QueryResult<usize> {
    let limit: usize = value
        .parse()
        .map_err(|_| QueryError::InvalidParam(format!("Invalid limit: {}", value)))?;
    if limit == 0 {
        return Err(QueryError::InvalidParam(format!("Invalid limit: {}", value)));
    }
    Ok(limit)
}

/// One filter parameter: `field=value` or `field[op]=value`
fn parse_filter(key: &str, value: &str) -> QueryResult<FilterExpr> {
    let (field, operator) = parse_filter_key(key)?;

    let parsed_value = if operator == FilterOperator::In {
        Value::Array(value.split(',').map(coerce_value).collect())
    } else {
        coerce_value(value)
    };

    Ok(FilterExpr::new(field, operator, parsed_value))
}

/// Split `field[op]` into its parts; a bare key is an equality filter
fn parse_filter_key(key: &str) -> QueryResult<(String, FilterOperator)> {
    let Some(open) = key.find('[') else {
        return Ok((key.to_string(), FilterOperator::Eq));
    };

    let Some(token) = key[open..].strip_prefix('[').and_then(|rest| rest.strip_suffix(']'))
    else {
        return Err(QueryError::InvalidParam(format!(
            "Malformed filter key: {}",
            key
        )));
    };

    let field = &key[..open];
    if field.is_empty() || token.is_empty() {
        return Err(QueryError::InvalidParam(format!(
            "Malformed filter key: {}",
            key
        )));
    }

    let operator = FilterOperator::parse(token)
        .ok_or_else(|| QueryError::UnknownOperator(token.to_string()))?;

    Ok((field.to_string(), operator))
}

/// Coerce a raw parameter into the JSON type it spells
fn coerce_value(raw: &str) -> Value {
    let raw = raw.trim();
    match raw {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(n) = raw.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(n) {
            return Value::Number(number);
        }
    }
    Value::String(raw.to_string())
}
