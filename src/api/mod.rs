//! # API Boundary
//!
//! The uniform error type and response envelope shared by every route.
//! Clients branch on the `success` flag alone; errors always carry the
//! same envelope shape as successes.

pub mod envelope;
pub mod errors;

pub use envelope::{Envelope, TokenEnvelope};
pub use errors::{ApiError, ApiResult};

use uuid::Uuid;

/// Parse a path identifier, mapping bad formats to a 404.
///
/// An identifier that cannot be a valid id can never name an existing
/// resource, so the caller sees the same error as for a missing one.
pub fn parse_id(resource: &'static str, raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(resource, raw))
}
