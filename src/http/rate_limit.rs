//! # Rate Limiting
//!
//! Token-bucket limiter keyed per client. Each key gets a bucket holding
//! the configured request budget; tokens refill continuously over the
//! window. Requests that find an empty bucket get a 429 in the standard
//! error envelope.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::RwLock;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::ApiError;
use crate::config::RateLimitConfig;
use crate::http::state::AppState;

/// One client's bucket
#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket rate limiter
pub struct RateLimiter {
    buckets: RwLock<HashMap<String, Bucket>>,
    capacity: f64,
    /// Tokens per second
    refill_rate: f64,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let capacity = f64::from(config.max_requests.max(1));
        let window = config.window_secs.max(1) as f64;
        Self {
            buckets: RwLock::new(HashMap::new()),
            capacity,
            refill_rate: capacity / window,
        }
    }

    /// Consume one token for the key; false means over budget
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let Ok(mut buckets) = self.buckets.write() else {
            // A poisoned limiter fails open rather than refusing all traffic
            return true;
        };

        let bucket = buckets.entry(key.to_string()).or_insert(Bucket {
            tokens: self.capacity,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(self.capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Best available client key: forwarded address, then peer address
fn client_key(req: &Request) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
    {
        return forwarded.trim().to_string();
    }
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    "anonymous".to_string()
}

/// Middleware applying the limiter to every request
pub async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let key = client_key(&req);
    if state.limiter.check(&key) {
        next.run(req).await
    } else {
        ApiError::new(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests, please try again later",
        )
        .into_response()
    }
}
