//! # Configuration
//!
//! All tunables in one serde-deserializable tree with per-field defaults,
//! overridable from `CAMPDIR_*` environment variables. Defaults are suitable
//! for local development only.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::auth::jwt::JwtConfig;
use crate::email::EmailConfig;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty means permissive for development
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpConfig {
    /// Socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Session cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Cookie lifetime in days (default: 30, matching the token lifetime)
    #[serde(default = "default_cookie_expire_days")]
    pub expire_days: i64,

    /// Set the Secure attribute (default: false; enable behind TLS)
    #[serde(default)]
    pub secure: bool,
}

fn default_cookie_expire_days() -> i64 {
    30
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            expire_days: default_cookie_expire_days(),
            secure: false,
        }
    }
}

/// Photo upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory uploaded photos are written to
    #[serde(default = "default_upload_dir")]
    pub dir: PathBuf,

    /// Maximum accepted file size in bytes (default: 1 MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("public/uploads")
}

fn default_max_file_size() -> usize {
    1_000_000
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_file_size: default_max_file_size(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per window per client (default: 100)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Window length in seconds (default: 600)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_max_requests() -> u32 {
    100
}

fn default_window_secs() -> u64 {
    600
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cookie: CookieConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Defaults overridden by any `CAMPDIR_*` environment variables present
    pub fn from_env() -> Self {
        let mut config = Self::default();

        override_string(&mut config.http.host, "CAMPDIR_HOST");
        override_parsed(&mut config.http.port, "CAMPDIR_PORT");
        if let Ok(origins) = env::var("CAMPDIR_CORS_ORIGINS") {
            config.http.cors_origins = origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
        }

        override_string(&mut config.jwt.secret, "CAMPDIR_JWT_SECRET");
        override_parsed(&mut config.jwt.expire_days, "CAMPDIR_JWT_EXPIRE_DAYS");

        override_parsed(&mut config.cookie.expire_days, "CAMPDIR_COOKIE_EXPIRE_DAYS");
        override_parsed(&mut config.cookie.secure, "CAMPDIR_COOKIE_SECURE");

        override_string(&mut config.email.smtp_host, "CAMPDIR_SMTP_HOST");
        override_parsed(&mut config.email.smtp_port, "CAMPDIR_SMTP_PORT");
        override_string(&mut config.email.smtp_user, "CAMPDIR_SMTP_USER");
        override_string(&mut config.email.smtp_password, "CAMPDIR_SMTP_PASSWORD");
        override_string(&mut config.email.from_email, "CAMPDIR_FROM_EMAIL");
        override_string(&mut config.email.from_name, "CAMPDIR_FROM_NAME");
        override_string(&mut config.email.base_url, "CAMPDIR_BASE_URL");

        if let Ok(dir) = env::var("CAMPDIR_UPLOAD_DIR") {
            config.uploads.dir = PathBuf::from(dir);
        }
        override_parsed(&mut config.uploads.max_file_size, "CAMPDIR_MAX_FILE_UPLOAD");

        override_parsed(&mut config.rate_limit.max_requests, "CAMPDIR_RATE_LIMIT_MAX");
        override_parsed(
            &mut config.rate_limit.window_secs,
            "CAMPDIR_RATE_LIMIT_WINDOW_SECS",
        );

        config
    }
}

fn override_string(slot: &mut String, name: &str) {
    if let Ok(value) = env::var(name) {
        *slot = value;
    }
}

fn override_parsed<T: std::str::FromStr>(slot: &mut T, name: &str) {
    if let Ok(value) = env::var(name) {
        match value.parse() {
            Ok(parsed) => *slot = parsed,
            Err(_) => tracing::warn!(var = name, value = %value, "ignoring unparseable override"),
        }
    }
}
