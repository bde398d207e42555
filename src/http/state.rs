//! # Shared Application State
//!
//! One state value cloned into every handler: the store, the config, the
//! token manager, and the pluggable seams (email, geocoding, rate limiter).

use std::sync::Arc;

use crate::auth::JwtManager;
use crate::config::AppConfig;
use crate::email::{EmailSender, SmtpEmailSender};
use crate::geo::{Geocoder, OfflineGeocoder};
use crate::http::rate_limit::RateLimiter;
use crate::store::Db;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Db>,
    pub config: Arc<AppConfig>,
    pub jwt: JwtManager,
    pub email: Arc<dyn EmailSender>,
    pub geocoder: Arc<dyn Geocoder>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    /// State with the SMTP sender from config
    pub fn new(config: AppConfig) -> Self {
        let email = Arc::new(SmtpEmailSender::new(config.email.clone()));
        Self::with_email_sender(config, email)
    }

    /// State with a custom email sender, used by tests to observe sends
    pub fn with_email_sender(config: AppConfig, email: Arc<dyn EmailSender>) -> Self {
        let jwt = JwtManager::new(config.jwt.clone());
        let limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
        Self {
            db: Arc::new(Db::new()),
            config: Arc::new(config),
            jwt,
            email,
            geocoder: Arc::new(OfflineGeocoder::new()),
            limiter,
        }
    }
}
