//! # Store Errors
//!
//! Error types for the document store. Translated to HTTP statuses at the
//! API boundary: missing documents map to 404, constraint violations to 400,
//! everything else to 500.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Document not found in its collection
    #[error("{resource} not found with id of {id}")]
    NotFound { resource: &'static str, id: String },

    /// Uniqueness constraint violated, names the duplicated field and value
    #[error("Duplicate value entered for {field}: {value}")]
    Duplicate { field: &'static str, value: String },

    /// Lock poisoned or other storage failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::Duplicate { .. } => StatusCode::BAD_REQUEST,
            StoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
