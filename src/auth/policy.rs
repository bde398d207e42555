//! # Ownership Policy
//!
//! The one ownership check shared by every owned resource: the acting
//! principal must be the recorded owner or hold the admin role. Callers
//! supply the owner id from whatever field their resource records it in.

use uuid::Uuid;

use super::errors::{AuthError, AuthResult};
use crate::model::{Role, User};

/// Require that `principal` may act on a resource owned by `owner`.
///
/// `action` and `resource` only shape the error message ("update" /
/// "bootcamp" reads as "not authorized to update this bootcamp").
pub fn require_owner(
    principal: &User,
    owner: Uuid,
    action: &'static str,
    resource: &'static str,
) -> AuthResult<()> {
    if principal.role == Role::Admin || principal.id == owner {
        return Ok(());
    }
    Err(AuthError::NotOwner {
        user: principal.id.to_string(),
        action,
        resource,
    })
}

/// Require that the principal's role is in the allowed set
pub fn require_role(principal: &User, allowed: &[Role]) -> AuthResult<()> {
    if allowed.contains(&principal.role) {
        return Ok(());
    }
    Err(AuthError::RoleForbidden(principal.role.to_string()))
}
