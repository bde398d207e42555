//! End-to-end tests through the router: envelopes, auth plumbing, nested
//! routes, rate limiting, and photo upload.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use campdir::config::AppConfig;
use campdir::email::MockEmailSender;
use campdir::http::{build_router, AppState};
use campdir::model::{Role, User};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_state(config: AppConfig) -> AppState {
    AppState::with_email_sender(config, Arc::new(MockEmailSender::new()))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Register a publisher and return their bearer token
async fn register_publisher(router: &Router, name: &str, email: &str) -> String {
    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            json!({"name": name, "email": email, "password": "123456", "role": "publisher"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

async fn create_bootcamp(router: &Router, token: &str, name: &str) -> Value {
    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/api/v1/bootcamps",
            Some(token),
            json!({
                "name": name,
                "description": "Full stack development",
                "address": "233 Bay State Rd Boston MA 02215",
                "careers": ["Web Development"],
                "housing": true
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"].clone()
}

#[tokio::test]
async fn health_endpoint_answers() {
    let router = build_router(test_state(AppConfig::default()));
    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn unknown_routes_get_the_error_envelope() {
    let router = build_router(test_state(AppConfig::default()));
    let (status, body) = send(&router, get("/api/v1/nothing-here")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["data"], Value::Null);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn register_sets_cookie_and_returns_token() {
    let router = build_router(test_state(AppConfig::default()));

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/auth/register",
            None,
            json!({"name": "John", "email": "john@gmail.com", "password": "123456"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn me_requires_a_token_and_accepts_bearer_or_cookie() {
    let router = build_router(test_state(AppConfig::default()));
    let token = register_publisher(&router, "Pat", "pat@devworks.com").await;

    let (status, body) = send(&router, get("/api/v1/auth/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not authorized to access this route");
    assert_eq!(body["data"], Value::Null);

    let (status, body) = send(&router, get_auth("/api/v1/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "pat@devworks.com");
    // Secrets never serialize
    assert!(body["data"].get("passwordHash").is_none());

    let cookie_request = Request::builder()
        .uri("/api/v1/auth/me")
        .header(header::COOKIE, format!("token={}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, cookie_request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Pat");
}

#[tokio::test]
async fn login_failures_are_uniform_over_http() {
    let router = build_router(test_state(AppConfig::default()));
    register_publisher(&router, "Pat", "pat@devworks.com").await;

    let (status_a, body_a) = send(
        &router,
        json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            json!({"email": "pat@devworks.com", "password": "wrong!"}),
        ),
    )
    .await;
    let (status_b, body_b) = send(
        &router,
        json_request(
            "POST",
            "/api/v1/auth/login",
            None,
            json!({"email": "ghost@devworks.com", "password": "123456"}),
        ),
    )
    .await;

    assert_eq!(status_a, StatusCode::UNAUTHORIZED);
    assert_eq!(status_b, StatusCode::UNAUTHORIZED);
    assert_eq!(body_a["error"], "Invalid credentials");
    assert_eq!(body_a["error"], body_b["error"]);
}

#[tokio::test]
async fn bootcamp_crud_and_list_envelope() {
    let router = build_router(test_state(AppConfig::default()));
    let token = register_publisher(&router, "Pat", "pat@devworks.com").await;

    let bootcamp = create_bootcamp(&router, &token, "Devworks Bootcamp").await;
    assert_eq!(bootcamp["slug"], "devworks-bootcamp");
    assert_eq!(bootcamp["photo"], "no-photo.jpg");

    let (status, body) = send(&router, get("/api/v1/bootcamps")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["name"], "Devworks Bootcamp");
    // List expansion inlines children
    assert!(body["data"][0]["courses"].is_array());

    let id = bootcamp["id"].as_str().unwrap();
    let (status, body) = send(&router, get(&format!("/api/v1/bootcamps/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], *id);

    // Unauthenticated mutation is refused
    let (status, _) = send(
        &router,
        json_request(
            "PUT",
            &format!("/api/v1/bootcamps/{}", id),
            None,
            json!({"description": "New"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_id_format_reads_as_missing_resource() {
    let router = build_router(test_state(AppConfig::default()));
    let (status, body) = send(&router, get("/api/v1/bootcamps/abc")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Bootcamp not found with id of abc");
}

#[tokio::test]
async fn nested_course_routes_scope_to_the_parent() {
    let router = build_router(test_state(AppConfig::default()));
    let token = register_publisher(&router, "Pat", "pat@devworks.com").await;
    let bootcamp = create_bootcamp(&router, &token, "Devworks Bootcamp").await;
    let id = bootcamp["id"].as_str().unwrap();

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            &format!("/api/v1/bootcamps/{}/courses", id),
            Some(&token),
            json!({
                "title": "Front End Web Development",
                "description": "HTML and CSS",
                "weeks": "8",
                "tuition": 8000,
                "minimumSkill": "beginner"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["bootcamp"], *id);

    // Scoped list carries the parent id raw (no re-expansion)
    let (status, body) = send(&router, get(&format!("/api/v1/bootcamps/{}/courses", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["bootcamp"], *id);

    // Flat list expands the parent into a restricted field set
    let (status, body) = send(&router, get("/api/v1/courses")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["bootcamp"]["name"], "Devworks Bootcamp");
    assert!(body["data"][0]["bootcamp"]["careers"].is_null());

    // Aggregate landed on the parent
    let (_, body) = send(&router, get(&format!("/api/v1/bootcamps/{}", id))).await;
    assert_eq!(body["data"]["averageCost"], 8000.0);
}

#[tokio::test]
async fn list_pagination_over_http() {
    let state = test_state(AppConfig::default());
    let router = build_router(state.clone());

    // An admin may own several bootcamps; seed one directly and sign for it
    let admin = User::new(
        "Admin".to_string(),
        "admin@campdir.dev".to_string(),
        "123456",
        Role::Admin,
    )
    .unwrap();
    let admin_id = admin.id;
    state.db.users.insert(admin).unwrap();
    let token = state.jwt.sign(admin_id).unwrap();

    for i in 0..3 {
        create_bootcamp(&router, &token, &format!("Camp Number {}", i)).await;
    }

    let (status, body) = send(&router, get("/api/v1/bootcamps?limit=2&page=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["total"], 3);
    assert_eq!(body["pagination"]["prev"]["page"], 1);
    assert!(body["pagination"].get("next").is_none());
}

#[tokio::test]
async fn admin_routes_reject_non_admins() {
    let router = build_router(test_state(AppConfig::default()));
    let token = register_publisher(&router, "Pat", "pat@devworks.com").await;

    let (status, body) = send(&router, get_auth("/api/v1/users", &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "User role publisher is not authorized to access this route"
    );
}

#[tokio::test]
async fn rate_limit_kicks_in_past_the_budget() {
    let mut config = AppConfig::default();
    config.rate_limit.max_requests = 2;
    config.rate_limit.window_secs = 600;
    let router = build_router(test_state(config));

    let (status, _) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Too many requests, please try again later");
}

fn multipart_request(uri: &str, token: &str, content_type: &str, payload: &str) -> Request<Body> {
    let boundary = "XBOUNDARY";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"photo.png\"\r\n\
         Content-Type: {ct}\r\n\r\n{payload}\r\n--{b}--\r\n",
        b = boundary,
        ct = content_type,
        payload = payload
    );
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn photo_upload_stores_the_file_and_updates_the_bootcamp() {
    let upload_dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.uploads.dir = upload_dir.path().to_path_buf();

    let state = test_state(config);
    let router = build_router(state.clone());
    let token = register_publisher(&router, "Pat", "pat@devworks.com").await;
    let bootcamp = create_bootcamp(&router, &token, "Devworks Bootcamp").await;
    let id = bootcamp["id"].as_str().unwrap();

    let (status, body) = send(
        &router,
        multipart_request(
            &format!("/api/v1/bootcamps/{}/photo", id),
            &token,
            "image/png",
            "not-really-png-bytes",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let filename = body["data"].as_str().unwrap();
    assert_eq!(filename, format!("photo_{}.png", id));
    assert!(upload_dir.path().join(filename).exists());

    let stored = state.db.bootcamps.all().unwrap().remove(0);
    assert_eq!(stored.photo, filename);
}

#[tokio::test]
async fn photo_upload_rejects_non_images_and_oversize_files() {
    let upload_dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.uploads.dir = upload_dir.path().to_path_buf();
    config.uploads.max_file_size = 8;

    let router = build_router(test_state(config));
    let token = register_publisher(&router, "Pat", "pat@devworks.com").await;
    let bootcamp = create_bootcamp(&router, &token, "Devworks Bootcamp").await;
    let id = bootcamp["id"].as_str().unwrap();
    let uri = format!("/api/v1/bootcamps/{}/photo", id);

    let (status, body) = send(
        &router,
        multipart_request(&uri, &token, "text/plain", "hello"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please upload an image file");

    let (status, body) = send(
        &router,
        multipart_request(&uri, &token, "image/png", "way-more-than-eight-bytes"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please upload an image less than 8 bytes");
}
