//! # Auth Routes
//!
//! Registration, login, account management, and the password-reset flow.
//! Token-issuing endpoints also set an HTTP-only session cookie carrying
//! the signed token.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;

use super::json::ApiJson;
use super::state::AppState;
use crate::api::{ApiError, ApiResult, Envelope, TokenEnvelope};
use crate::auth::Principal;
use crate::config::CookieConfig;
use crate::model::user::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    UpdateDetailsRequest, UpdatePasswordRequest,
};
use crate::model::User;
use crate::service;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/me", get(me))
        .route("/updatedetails", put(update_details))
        .route("/updatepassword", put(update_password))
        .route("/forgotpassword", post(forgot_password))
        .route("/resetpassword/:token", put(reset_password))
}

/// Session cookie carrying the signed token
fn session_cookie(config: &CookieConfig, token: &str) -> String {
    let max_age = config.expire_days * 24 * 60 * 60;
    let mut cookie = format!(
        "token={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
        token, max_age
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Short-lived replacement cookie used on logout
fn clear_cookie() -> String {
    "token=none; Max-Age=10; Path=/; HttpOnly; SameSite=Lax".to_string()
}

/// Sign a token for the user, set the cookie, return the token envelope
fn send_token_response(state: &AppState, user: &User, status: StatusCode) -> ApiResult<Response> {
    let token = state.jwt.sign(user.id)?;
    let cookie = session_cookie(&state.config.cookie, &token);
    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(TokenEnvelope::new(token)),
    )
        .into_response())
}

async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<Response> {
    let user = service::auth::register(&state.db, request)?;
    send_token_response(&state, &user, StatusCode::CREATED)
}

async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Response> {
    let user = service::auth::login(&state.db, request)?;
    send_token_response(&state, &user, StatusCode::OK)
}

async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_cookie())],
        Json(Envelope::data(json!({}))),
    )
}

async fn me(principal: Principal) -> impl IntoResponse {
    Json(Envelope::data(principal.user))
}

async fn update_details(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(request): ApiJson<UpdateDetailsRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = service::auth::update_details(&state.db, &principal.user, request)?;
    Ok(Json(Envelope::data(user)))
}

async fn update_password(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(request): ApiJson<UpdatePasswordRequest>,
) -> ApiResult<Response> {
    let user = service::auth::update_password(&state.db, &principal.user, request)?;
    send_token_response(&state, &user, StatusCode::OK)
}

async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ForgotPasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.email.is_empty() {
        return Err(ApiError::bad_request("Please provide an email"));
    }
    service::auth::forgot_password(&state.db, state.email.as_ref(), &request.email)?;
    Ok(Json(Envelope::data(json!("Email sent"))))
}

async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    ApiJson(request): ApiJson<ResetPasswordRequest>,
) -> ApiResult<Response> {
    let user = service::auth::reset_password(&state.db, &token, &request.password)?;
    send_token_response(&state, &user, StatusCode::OK)
}
