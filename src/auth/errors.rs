//! # Auth Errors
//!
//! Error types for authentication and authorization. Failure reasons that
//! could act as an oracle (unknown email vs wrong password, bad signature vs
//! expired token) collapse into one message per class.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and authorization errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Login failed; never says whether the email or the password was wrong
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, malformed, expired, or otherwise unusable access token
    #[error("Not authorized to access this route")]
    NotAuthorized,

    /// Current password did not match on a password change
    #[error("Password is incorrect")]
    WrongPassword,

    /// Principal's role is outside the route's allowed set
    #[error("User role {0} is not authorized to access this route")]
    RoleForbidden(String),

    /// Principal is neither the resource owner nor an admin
    #[error("User {user} is not authorized to {action} this {resource}")]
    NotOwner {
        user: String,
        action: &'static str,
        resource: &'static str,
    },

    /// Reset token missing, mismatched, or expired; never says which
    #[error("Invalid token")]
    InvalidResetToken,

    /// Password does not meet requirements
    #[error("{0}")]
    WeakPassword(String),

    /// Reset email could not be dispatched
    #[error("Email could not be sent")]
    EmailSendFailed,

    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Token signing failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,
}

impl AuthError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidResetToken => StatusCode::BAD_REQUEST,

            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::NotAuthorized => StatusCode::UNAUTHORIZED,
            AuthError::WrongPassword => StatusCode::UNAUTHORIZED,

            AuthError::RoleForbidden(_) => StatusCode::FORBIDDEN,
            AuthError::NotOwner { .. } => StatusCode::FORBIDDEN,

            AuthError::EmailSendFailed => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::HashingFailed => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenGenerationFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
