//! API tests against an in-memory database.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use server::app::{build_app, AppState};
use server::config::Config;
use server::store;

async fn test_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    store::run_migrations(&pool).await.unwrap();

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        smtp_host: "smtp.gmail.com".to_string(),
        smtp_port: 587,
        smtp_user: None,
        smtp_pass: None,
        recipient_email: None,
    };

    build_app(AppState { pool, config })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_is_ok() {
    let app = test_app().await;
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_list_and_aliases() {
    let app = test_app().await;

    // Canonical field names
    let (status, body) = send(
        &app,
        post_json(
            "/companies",
            json!({
                "name": "Amazon",
                "list_url": "https://www.amazon.jobs/en/",
                "role_keywords": "software,engineer",
                "max_age_days": 3
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    // Legacy aliases
    let (status, _) = send(
        &app,
        post_json(
            "/companies",
            json!({
                "company": "Beta",
                "careers": "https://careers.example.com",
                "keywords": "rust",
                "postdays": 14
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/companies")).await;
    assert_eq!(status, StatusCode::OK);

    let companies = body["companies"].as_array().unwrap();
    assert_eq!(companies.len(), 2);
    // Newest first
    assert_eq!(companies[0]["name"], "Beta");
    assert_eq!(companies[0]["max_age_days"], 14);
    assert_eq!(companies[1]["role_keywords"], "software,engineer");
    assert_eq!(companies[1]["max_age_days"], 3);
    // Defaults filled in
    assert_eq!(companies[0]["detail_fetch_limit"], 40);
    assert_eq!(companies[0]["active"], true);
}

#[tokio::test]
async fn test_create_requires_name_and_url() {
    let app = test_app().await;

    let (status, body) = send(&app, post_json("/companies", json!({ "name": "X" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("required"));
}

#[tokio::test]
async fn test_create_duplicate_name_conflicts() {
    let app = test_app().await;
    let payload = json!({ "name": "Amazon", "list_url": "https://www.amazon.jobs/en/" });

    let (status, _) = send(&app, post_json("/companies", payload.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, post_json("/companies", payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["detail"], "Company with this name already exists");
}

#[tokio::test]
async fn test_delete_and_reset() {
    let app = test_app().await;

    let (_, body) = send(
        &app,
        post_json(
            "/companies",
            json!({ "name": "Amazon", "list_url": "https://www.amazon.jobs/en/" }),
        ),
    )
    .await;
    let id = body["id"].as_i64().unwrap();

    let delete = |id: i64| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/companies/{id}"))
            .body(Body::empty())
            .unwrap()
    };

    let (status, _) = send(&app, delete(id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, delete(id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &app,
        post_json(
            "/companies",
            json!({ "name": "Amazon", "list_url": "https://www.amazon.jobs/en/" }),
        ),
    )
    .await;
    let (status, _) = send(&app, post_json("/companies/reset", json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get("/companies")).await;
    assert!(body["companies"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_run_unknown_company_is_404() {
    let app = test_app().await;
    let (status, body) = send(&app, post_json("/run/999", json!({}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Company not found");
}

#[tokio::test]
async fn test_run_unsupported_host_does_not_run() {
    let app = test_app().await;

    let (_, body) = send(
        &app,
        post_json(
            "/companies",
            json!({ "name": "Other", "list_url": "https://careers.example.com/jobs" }),
        ),
    )
    .await;
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, post_json(&format!("/run/{id}"), json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["ran"], false);
    assert!(body["reason"].as_str().unwrap().contains("Amazon"));
}
