//! # Query Errors
//!
//! Malformed list-query input is a client error, never a parse panic.

use thiserror::Error;

/// Result type for query parsing
pub type QueryResult<T> = Result<T, QueryError>;

/// List-query parsing errors, all of which map to 400
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// Reserved parameter with an unusable value
    #[error("Invalid query parameter: {0}")]
    InvalidParam(String),

    /// Bracketed operator that is not part of the filter grammar
    #[error("Unknown filter operator: {0}")]
    UnknownOperator(String),
}
