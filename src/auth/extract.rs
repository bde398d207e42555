//! # Principal Extraction
//!
//! Pulls the access token from the bearer header or the session cookie,
//! verifies it, and loads the user it names. Routes that take a `Principal`
//! argument are protected; everything that can go wrong here is the same
//! uniform 401.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use super::errors::AuthError;
use crate::api::ApiError;
use crate::http::state::AppState;
use crate::model::{Role, User};

/// The authenticated user behind a request
#[derive(Debug, Clone)]
pub struct Principal {
    pub user: User,
}

impl Principal {
    /// Role gate for the wrapped user
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AuthError> {
        super::policy::require_role(&self.user, allowed)
    }
}

/// Token from `Authorization: Bearer <token>`
fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// Token from the session cookie
fn cookie_token(parts: &Parts) -> Option<String> {
    let cookies = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix("token="))
        .map(str::to_string)
}

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or(AuthError::NotAuthorized)?;

        let user_id = state.jwt.verify(&token)?;
        let user = state
            .db
            .users
            .get(user_id)?
            .ok_or(AuthError::NotAuthorized)?;

        Ok(Principal { user })
    }
}
