//! # Query Processor
//!
//! The generic list-endpoint contract: a request's query string becomes a
//! filtered, field-selected, sorted, paginated page of documents plus
//! pagination metadata. Handlers serialize their collection, parse the
//! parameters, and run the engine; the processor itself performs no store
//! writes.

pub mod engine;
pub mod errors;
pub mod filter;
pub mod params;

pub use engine::{ListResult, Pagination};
pub use errors::{QueryError, QueryResult};
pub use filter::{FilterExpr, FilterOperator, FilterSet};
pub use params::{ListParams, SortKey, DEFAULT_LIMIT};

use serde::Serialize;
use serde_json::Value;

/// Serialize documents for the engine
pub fn to_documents<T: Serialize>(items: Vec<T>) -> Result<Vec<Value>, serde_json::Error> {
    items.into_iter().map(serde_json::to_value).collect()
}
