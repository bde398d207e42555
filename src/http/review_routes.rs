//! # Review Routes
//!
//! Flat CRUD under /reviews; listing and creation also mount under a parent
//! bootcamp path, which pins the bootcamp filter and suppresses expansion.

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
use crate::model::{CreateReview, UpdateReview};
use crate::query::{engine, to_documents, ListParams};
use crate::service;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/:id", get(get_one).put(update).delete(delete_one))
}

/// GET /reviews with bootcamp expansion
async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<impl IntoResponse> {
    let params = ListParams::parse(&params)?;
    let docs = to_documents(state.db.reviews.all()?)?;
    let mut result = engine::run(docs, &params);
    service::reviews::expand_bootcamp(&state.db, &mut result.data)?;
    Ok(Json(Envelope::list(result)))
}

/// GET /bootcamps/:id/reviews, scoped to the parent and not expanded
pub async fn list_for_bootcamp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<impl IntoResponse> {
    let bootcamp_id = parse_id("Bootcamp", &id)?;
    state.db.bootcamps.get_required(bootcamp_id)?;

    let params = ListParams::parse(&params)?.scope("bootcamp", json!(bootcamp_id));
    let docs = to_documents(state.db.reviews.all()?)?;
    let result = engine::run(docs, &params);
    Ok(Json(Envelope::list(result)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id("Review", &id)?;
    let review = state.db.reviews.get_required(id)?;

    let mut docs = vec![serde_json::to_value(review)?];
    service::reviews::expand_bootcamp(&state.db, &mut docs)?;
    let doc = docs.remove(0);

    Ok(Json(Envelope::data(doc)))
}

/// POST /bootcamps/:id/reviews
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<CreateReview>,
) -> ApiResult<impl IntoResponse> {
    let bootcamp_id = parse_id("Bootcamp", &id)?;
    let review = service::reviews::create(&state.db, &principal.user, bootcamp_id, payload)?;
    Ok((StatusCode::CREATED, Json(Envelope::data(review))))
}

async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateReview>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id("Review", &id)?;
    let review = service::reviews::update(&state.db, &principal.user, id, payload)?;
    Ok(Json(Envelope::data(review)))
}

async fn delete_one(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id("Review", &id)?;
    service::reviews::delete(&state.db, &principal.user, id)?;
    Ok(Json(Envelope::data(json!({}))))
}
