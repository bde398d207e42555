//! # Bootcamp Routes
//!
//! CRUD plus the geo-radius search and photo upload. Nested course and
//! review routes live under a bootcamp path and reuse the course/review
//! handlers scoped to the parent.

use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::json;

use super::json::ApiJson;
use super::state::AppState;
use crate::api::{parse_id, ApiError, ApiResult, Envelope};
use crate::auth::{require_owner, Principal};
use crate::model::{CreateBootcamp, UpdateBootcamp};
use crate::query::{engine, to_documents, ListParams};
use crate::service;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/radius/:zipcode/:distance", get(radius))
        .route("/:id", get(get_one).put(update).delete(delete_one))
        .route("/:id/photo", put(upload_photo))
        .route(
            "/:id/courses",
            get(super::course_routes::list_for_bootcamp).post(super::course_routes::create),
        )
        .route(
            "/:id/reviews",
            get(super::review_routes::list_for_bootcamp).post(super::review_routes::create),
        )
}

/// GET / with the full list-query contract, expanding courses and reviews
async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<impl IntoResponse> {
    let params = ListParams::parse(&params)?;
    let docs = to_documents(state.db.bootcamps.all()?)?;
    let mut result = engine::run(docs, &params);
    service::bootcamps::expand(&state.db, &mut result.data)?;
    Ok(Json(Envelope::list(result)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id("Bootcamp", &id)?;
    let bootcamp = state.db.bootcamps.get_required(id)?;
    Ok(Json(Envelope::data(bootcamp)))
}

async fn create(
    State(state): State<AppState>,
    principal: Principal,
    ApiJson(payload): ApiJson<CreateBootcamp>,
) -> ApiResult<impl IntoResponse> {
    let bootcamp = service::bootcamps::create(
        &state.db,
        state.geocoder.as_ref(),
        &principal.user,
        payload,
    )?;
    Ok((StatusCode::CREATED, Json(Envelope::data(bootcamp))))
}

async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateBootcamp>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id("Bootcamp", &id)?;
    let bootcamp = service::bootcamps::update(
        &state.db,
        state.geocoder.as_ref(),
        &principal.user,
        id,
        payload,
    )?;
    Ok(Json(Envelope::data(bootcamp)))
}

async fn delete_one(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id("Bootcamp", &id)?;
    service::bootcamps::delete(&state.db, &principal.user, id)?;
    Ok(Json(Envelope::data(json!({}))))
}

/// GET /radius/:zipcode/:distance, distance in miles
async fn radius(
    State(state): State<AppState>,
    Path((zipcode, distance)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let distance: f64 = distance
        .parse()
        .map_err(|_| ApiError::bad_request("Please provide a valid distance"))?;

    let bootcamps =
        service::bootcamps::within_radius(&state.db, state.geocoder.as_ref(), &zipcode, distance)?;
    Ok(Json(Envelope::items(bootcamps)))
}

/// PUT /:id/photo, multipart upload of a single image file
async fn upload_photo(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id("Bootcamp", &id)?;

    // Ownership is checked before any bytes are read or written
    let bootcamp = state.db.bootcamps.get_required(id)?;
    require_owner(&principal.user, bootcamp.user, "update", "bootcamp")?;

    let field = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Problem with file upload"))?
        .ok_or_else(|| ApiError::bad_request("Please upload a file"))?;

    let content_type = field.content_type().unwrap_or_default().to_string();
    let Some(extension) = content_type.strip_prefix("image/") else {
        return Err(ApiError::bad_request("Please upload an image file"));
    };
    let extension = extension.to_string();

    let data = field
        .bytes()
        .await
        .map_err(|_| ApiError::bad_request("Problem with file upload"))?;

    let max = state.config.uploads.max_file_size;
    if data.len() > max {
        return Err(ApiError::bad_request(format!(
            "Please upload an image less than {} bytes",
            max
        )));
    }

    let filename = format!("photo_{}.{}", id, extension);
    let dir = &state.config.uploads.dir;
    tokio::fs::create_dir_all(dir).await.map_err(|err| {
        tracing::error!(error = %err, "upload dir creation failed");
        ApiError::internal()
    })?;
    tokio::fs::write(dir.join(&filename), &data)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "photo write failed");
            ApiError::internal()
        })?;

    service::bootcamps::set_photo(&state.db, &principal.user, id, filename.clone())?;
    Ok(Json(Envelope::data(json!(filename))))
}
