//! # User Admin Routes
//!
//! Admin-only CRUD over the users collection. Every handler takes the
//! principal; the admin gate runs before any read or write.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use super::json::ApiJson;
use super::state::AppState;
use crate::api::{parse_id, ApiResult, Envelope};
use crate::auth::Principal;
use crate::model::user::UpsertUserRequest;
use crate::model::Role;
use crate::query::{engine, to_documents, ListParams};
use crate::service;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(delete_one))
}

async fn list(
    State(state): State<AppState>,
    principal: Principal,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<impl IntoResponse> {
    principal.require_role(&[Role::Admin])?;

    let params = ListParams::parse(&params)?;
    let docs = to_documents(state.db.users.all()?)?;
    let result = engine::run(docs, &params);
    Ok(Json(Envelope::list(result)))
}

async fn get_one(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    principal.require_role(&[Role::Admin])?;

    let id = parse_id("User", &id)?;
    let user = state.db.users.get_required(id)?;
    Ok(Json(Envelope::data(user)))
}

async fn create(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(payload): ApiJson<UpsertUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = service::users::create(&state.db, &principal.user, payload)?;
    Ok((StatusCode::CREATED, Json(Envelope::data(user))))
}

async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpsertUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id("User", &id)?;
    let user = service::users::update(&state.db, &principal.user, id, payload)?;
    Ok(Json(Envelope::data(user)))
}

async fn delete_one(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id("User", &id)?;
    service::users::delete(&state.db, &principal.user, id)?;
    Ok(Json(Envelope::data(json!({}))))
}
