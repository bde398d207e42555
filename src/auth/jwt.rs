//! # JWT Token Management
//!
//! HS256 access tokens carrying only the user id. Verification failures are
//! indistinguishable to the caller; the response is the same whether the
//! signature was bad, the token expired, or the claims were malformed.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{AuthError, AuthResult};

/// JWT claims for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Issued at (Unix epoch seconds)
    pub iat: i64,

    /// Expiration (Unix epoch seconds)
    pub exp: i64,

    /// Issuer
    pub iss: String,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (256-bit minimum recommended)
    #[serde(default = "default_secret")]
    pub secret: String,

    /// Access token lifetime in days
    #[serde(default = "default_expire_days")]
    pub expire_days: i64,

    /// Issuer identifier
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

fn default_secret() -> String {
    "CHANGE_THIS_SECRET_IN_PRODUCTION".to_string()
}

fn default_expire_days() -> i64 {
    30
}

fn default_issuer() -> String {
    "campdir".to_string()
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            expire_days: default_expire_days(),
            issuer: default_issuer(),
        }
    }
}

/// Token signing and verification
#[derive(Clone)]
pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Sign an access token for a user id
    pub fn sign(&self, user_id: Uuid) -> AuthResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.config.expire_days)).timestamp(),
            iss: self.config.issuer.clone(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)
    }

    /// Verify a token and return the user id it names.
    ///
    /// Every failure mode collapses into the same error.
    pub fn verify(&self, token: &str) -> AuthResult<Uuid> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::NotAuthorized)?;

        Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::NotAuthorized)
    }
}
