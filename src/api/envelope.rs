//! # Response Envelope
//!
//! Success envelope for all endpoints. List responses carry page size,
//! pagination descriptors, and the filtered total alongside the data.

use serde::Serialize;
use serde_json::Value;

use crate::query::engine::{ListResult, Pagination};

/// Standard success envelope
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T: Serialize> Envelope<T> {
    /// Envelope for a single resource
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
            pagination: None,
            total: None,
        }
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    /// Envelope for an unpaginated list, carrying only its size
    pub fn items(items: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(items.len()),
            pagination: None,
            total: None,
            data: items,
        }
    }
}

impl Envelope<Vec<Value>> {
    /// Envelope for a processed list result
    pub fn list(result: ListResult) -> Self {
        Self {
            success: true,
            count: Some(result.data.len()),
            pagination: Some(result.pagination),
            total: Some(result.total),
            data: result.data,
        }
    }
}

/// Envelope returned by token-issuing auth endpoints
#[derive(Debug, Clone, Serialize)]
pub struct TokenEnvelope {
    pub success: bool,
    pub token: String,
}

impl TokenEnvelope {
    pub fn new(token: String) -> Self {
        Self {
            success: true,
            token,
        }
    }
}
