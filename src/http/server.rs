//! # HTTP Server
//!
//! Router assembly and the serve loop. Global layers: security headers,
//! request tracing, CORS, and per-client rate limiting. Unknown paths get
//! the standard error envelope rather than a bare 404.

use std::net::SocketAddr;
use std::path::Path;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{middleware, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::rate_limit;
use super::state::AppState;
use crate::api::{ApiError, Envelope};
use crate::config::AppConfig;
use crate::service::seed;

/// Build the full router over the given state
pub fn build_router(state: AppState) -> Router {
    let cors = if state.config.http.cors_origins.is_empty() {
        // Permissive for development when no origins are configured
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = state
            .config
            .http
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/auth", super::auth_routes::routes())
        .nest("/api/v1/bootcamps", super::bootcamp_routes::routes())
        .nest("/api/v1/courses", super::course_routes::routes())
        .nest("/api/v1/reviews", super::review_routes::routes())
        .nest("/api/v1/users", super::user_routes::routes())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(Envelope::data(json!({ "status": "ok" })))
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Route not found")
}

/// Start the server, optionally loading seed data first
pub async fn serve(config: AppConfig, seed_file: Option<&Path>) -> Result<(), std::io::Error> {
    let state = AppState::new(config);

    if let Some(path) = seed_file {
        match seed::load(&state.db, state.geocoder.as_ref(), path) {
            Ok(summary) => tracing::info!(
                users = summary.users,
                bootcamps = summary.bootcamps,
                courses = summary.courses,
                reviews = summary.reviews,
                "seed data loaded"
            ),
            Err(err) => {
                tracing::error!(error = %err, "seed load failed");
                return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, err.to_string()));
            }
        }
    }

    let addr = state.config.http.socket_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "campdir API listening");

    let router = build_router(state);
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
