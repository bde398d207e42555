//! # Authentication & Authorization
//!
//! Token issuance and verification, principal extraction, the role gate,
//! and the shared ownership policy.

pub mod crypto;
pub mod errors;
pub mod extract;
pub mod jwt;
pub mod policy;

pub use errors::{AuthError, AuthResult};
pub use extract::Principal;
pub use jwt::{JwtConfig, JwtManager};
pub use policy::{require_owner, require_role};
