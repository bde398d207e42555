//! # User Model
//!
//! Principals of the API. Passwords are stored only as argon2id hashes and
//! never serialized; reset tokens are stored only as hashes next to their
//! expiry.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::crypto::{
    constant_time_str_eq, generate_token, hash_password, hash_token, validate_password,
    verify_password,
};
use crate::auth::errors::AuthResult;
use crate::store::Document;

/// Closed role set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Publisher,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::User => "user",
            Role::Publisher => "publisher",
            Role::Admin => "admin",
        };
        write!(f, "{}", name)
    }
}

/// User document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Unique across the collection
    pub email: String,
    pub role: Role,

    /// Argon2id hash, never plaintext
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Hash of the outstanding reset token, if any
    #[serde(skip_serializing, default)]
    pub reset_password_token: Option<String>,

    /// When the outstanding reset token stops being honored
    #[serde(skip_serializing, default)]
    pub reset_password_expire: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl Document for User {
    const RESOURCE: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl User {
    /// Create a user with a freshly hashed password
    pub fn new(name: String, email: String, password: &str, role: Role) -> AuthResult<Self> {
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            email,
            role,
            password_hash,
            reset_password_token: None,
            reset_password_expire: None,
            created_at: Utc::now(),
        })
    }

    /// Verify a password against the stored hash
    pub fn verify_password(&self, password: &str) -> AuthResult<bool> {
        verify_password(password, &self.password_hash)
    }

    /// Replace the password, re-running the password validator
    pub fn set_password(&mut self, password: &str) -> AuthResult<()> {
        validate_password(password)?;
        self.password_hash = hash_password(password)?;
        Ok(())
    }

    /// Issue a reset token: the hash and expiry are stored, the plaintext is
    /// returned for out-of-band delivery and never persisted
    pub fn issue_reset_token(&mut self, ttl: Duration) -> String {
        let raw = generate_token();
        self.reset_password_token = Some(hash_token(&raw));
        self.reset_password_expire = Some(Utc::now() + ttl);
        raw
    }

    /// Whether the supplied plaintext matches the outstanding, unexpired
    /// reset token. Comparison is constant-time.
    pub fn reset_token_matches(&self, raw: &str, now: DateTime<Utc>) -> bool {
        let (Some(stored), Some(expire)) =
            (&self.reset_password_token, self.reset_password_expire)
        else {
            return false;
        };
        constant_time_str_eq(stored, &hash_token(raw)) && expire > now
    }

    /// Drop any outstanding reset token
    pub fn clear_reset_token(&mut self) {
        self.reset_password_token = None;
        self.reset_password_expire = None;
    }
}

// ==================
// Request Types
// ==================

/// Registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

impl RegisterRequest {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Please add a name".to_string());
        }
        if !super::is_valid_email(&self.email) {
            errors.push("Please add a valid email".to_string());
        }
        if self.role == Role::Admin {
            errors.push("Role must be either user or publisher".to_string());
        }
        errors
    }
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Name/email update for the current user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDetailsRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Password change for the current user
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Forgot-password request
#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// Reset-password request body
#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub password: String,
}

/// Admin create/update payload for the users collection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(
            "John Doe".to_string(),
            "john@gmail.com".to_string(),
            "123456",
            Role::Publisher,
        )
        .unwrap()
    }

    #[test]
    fn test_password_is_hashed() {
        let user = user();
        assert!(!user.password_hash.is_empty());
        assert_ne!(user.password_hash, "123456");
        assert!(user.verify_password("123456").unwrap());
        assert!(!user.verify_password("654321").unwrap());
    }

    #[test]
    fn test_short_password_rejected() {
        let result = User::new(
            "John".to_string(),
            "john@gmail.com".to_string(),
            "12345",
            Role::User,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_serialization_omits_secrets() {
        let mut user = user();
        user.issue_reset_token(Duration::minutes(10));
        let json = serde_json::to_string(&user).unwrap();

        assert!(!json.contains("passwordHash"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("resetPasswordToken"));
    }

    #[test]
    fn test_reset_token_roundtrip() {
        let mut user = user();
        let raw = user.issue_reset_token(Duration::minutes(10));

        // Stored value is a hash, not the plaintext
        assert_ne!(user.reset_password_token.as_deref(), Some(raw.as_str()));

        assert!(user.reset_token_matches(&raw, Utc::now()));
        assert!(!user.reset_token_matches("wrong-token", Utc::now()));

        // Expired tokens are not honored even with the right plaintext
        let after_expiry = Utc::now() + Duration::minutes(11);
        assert!(!user.reset_token_matches(&raw, after_expiry));

        user.clear_reset_token();
        assert!(!user.reset_token_matches(&raw, Utc::now()));
    }

    #[test]
    fn test_register_rejects_admin_role() {
        let request = RegisterRequest {
            name: "Eve".to_string(),
            email: "eve@gmail.com".to_string(),
            password: "123456".to_string(),
            role: Role::Admin,
        };
        assert!(request
            .validate()
            .contains(&"Role must be either user or publisher".to_string()));
    }

    #[test]
    fn test_role_default_and_display() {
        assert_eq!(Role::default(), Role::User);
        assert_eq!(Role::Publisher.to_string(), "publisher");
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }
}
