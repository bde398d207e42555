//! # List Query Engine
//!
//! Applies a parsed list query to a set of serialized documents:
//! filter, sort, project, paginate. Totals and page boundaries are computed
//! against the filtered set, so `next` is present exactly when another page
//! of matching documents exists.

use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use super::filter::compare_values;
use super::params::{ListParams, SortKey};

/// Reference to an adjacent page
#[derive(Debug, Clone, Serialize)]
pub struct PageRef {
    pub page: usize,
    pub limit: usize,
}

/// Adjacent-page descriptors, present only when those pages exist
#[derive(Debug, Clone, Default, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

/// A processed page of documents
#[derive(Debug, Clone)]
pub struct ListResult {
    pub data: Vec<Value>,
    pub pagination: Pagination,
    /// Count of documents matching the filters, across all pages
    pub total: usize,
}

/// Run a list query over serialized documents
pub fn run(docs: Vec<Value>, params: &ListParams) -> ListResult {
    let mut matched: Vec<Value> = docs
        .into_iter()
        .filter(|doc| params.filters.matches(doc))
        .collect();

    sort_docs(&mut matched, &params.sort);

    let total = matched.len();
    let skip = (params.page - 1).saturating_mul(params.limit);

    let mut data: Vec<Value> = matched
        .into_iter()
        .skip(skip)
        .take(params.limit)
        .collect();

    if let Some(select) = &params.select {
        for doc in &mut data {
            project(doc, select);
        }
    }

    let pagination = Pagination {
        next: (params.page.saturating_mul(params.limit) < total).then(|| PageRef {
            page: params.page + 1,
            limit: params.limit,
        }),
        prev: (params.page > 1 && (params.page - 2).saturating_mul(params.limit) < total).then(
            || PageRef {
                page: params.page - 1,
                limit: params.limit,
            },
        ),
    };

    ListResult {
        data,
        pagination,
        total,
    }
}

/// Stable sort by the given keys, left to right priority; missing fields
/// sort before present ones
fn sort_docs(docs: &mut [Value], keys: &[SortKey]) {
    docs.sort_by(|a, b| {
        for key in keys {
            let av = a.get(&key.field).unwrap_or(&Value::Null);
            let bv = b.get(&key.field).unwrap_or(&Value::Null);
            let ordering = compare_values(av, bv);
            let ordering = if key.ascending {
                ordering
            } else {
                ordering.reverse()
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Keep only the selected fields; the id field always survives projection
fn project(doc: &mut Value, select: &[String]) {
    if let Value::Object(map) = doc {
        map.retain(|key, _| key == "id" || select.iter().any(|field| field == key));
    }
}
