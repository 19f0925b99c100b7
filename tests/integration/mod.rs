//! Integration tests for the contribution API.
//!
//! These drive the full router over file-backed stores in a temporary
//! directory, so every request goes through real files on disk.

use std::fs;
use std::path::Path;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use contribution_api::api::{create_router, AppState};
use contribution_api::config::Config;
use contribution_api::store::{DocumentKind, DocumentStore, FileStore, Stores};

/// Config pointing both documents into `dir`.
fn test_config(dir: &Path) -> Config {
    Config {
        contribution_file: dir.join("data.json"),
        ytd_file: dir.join("ytd_data.json"),
        ..Config::default()
    }
}

fn test_app() -> (TempDir, Config, Router) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = test_config(dir.path());
    let app = create_router(AppState::new(Stores::from_config(&config)), &config);
    (dir, config, app)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn get_without_files_serves_defaults_and_creates_nothing() {
    let (_dir, config, app) = test_app();

    let (status, contribution) = get_json(&app, "/api/contribution").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(contribution, json!({"type": "percentage", "value": 5}));

    let (status, ytd) = get_json(&app, "/api/ytd").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ytd,
        json!({
            "salary": 100000,
            "paychecks_per_year": 26,
            "ytd_contributions": 5200,
            "employer_match_rate": 0.5,
            "employer_match_cap": 6
        })
    );

    assert!(!config.contribution_file.exists());
    assert!(!config.ytd_file.exists());
}

#[tokio::test]
async fn contribution_round_trips_through_disk() {
    let (_dir, config, app) = test_app();
    let body = json!({"type": "fixed", "value": 200});

    let (status, saved) = post_json(&app, "/api/contribution", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved, json!({"status": "saved", "data": body}));
    assert!(config.contribution_file.exists());

    let (_, loaded) = get_json(&app, "/api/contribution").await;
    assert_eq!(loaded, body);

    // A fresh store over the same file sees the write.
    let reopened = FileStore::new(DocumentKind::Contribution, &config.contribution_file);
    assert_eq!(Value::Object(reopened.load().unwrap()), body);
}

#[tokio::test]
async fn ytd_round_trips_extra_and_missing_fields() {
    let (_dir, _config, app) = test_app();
    let body = json!({
        "salary": 92000.75,
        "ytd_contributions": 3100,
        "notes": "mid-year raise",
        "history": [1, 2, 3]
    });

    let (status, saved) = post_json(&app, "/api/ytd", &body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["data"], body);

    let (_, loaded) = get_json(&app, "/api/ytd").await;
    assert_eq!(loaded, body);
}

#[tokio::test]
async fn field_order_is_preserved() {
    let (_dir, _config, app) = test_app();
    let raw = r#"{"value":7,"type":"percentage","zeta":true,"alpha":null}"#;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contribution")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(raw))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .uri("/api/contribution")
        .body(Body::empty())
        .unwrap();
    let (_, bytes) = send(&app, request).await;
    assert_eq!(String::from_utf8(bytes).unwrap(), raw);
}

#[tokio::test]
async fn corrupt_file_fails_instead_of_defaulting() {
    let (_dir, config, app) = test_app();
    fs::write(&config.contribution_file, "{\"type\": \"fixed\",").unwrap();

    let (status, _) = get_json(&app, "/api/contribution").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // The other document is unaffected.
    let (status, _) = get_json(&app, "/api/ytd").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn post_repairs_a_corrupt_file() {
    let (_dir, config, app) = test_app();
    fs::write(&config.ytd_file, "not json at all").unwrap();
    let body = json!({"salary": 50000});

    let (status, _) = post_json(&app, "/api/ytd", &body).await;
    assert_eq!(status, StatusCode::OK);

    let (status, loaded) = get_json(&app, "/api/ytd").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded, body);
}

#[tokio::test]
async fn unwritable_location_is_a_server_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = Config {
        contribution_file: dir.path().join("missing").join("data.json"),
        ytd_file: dir.path().join("ytd_data.json"),
        ..Config::default()
    };
    let app = create_router(AppState::new(Stores::from_config(&config)), &config);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contribution")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"type":"fixed","value":1}"#))
        .unwrap();
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn concurrent_posts_leave_a_whole_document() {
    let (_dir, _config, app) = test_app();

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let body = json!({"type": "fixed", "value": i, "blob": "y".repeat(32 * 1024)});
                post_json(&app, "/api/contribution", &body).await.0
            })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }

    let (status, loaded) = get_json(&app, "/api/contribution").await;
    assert_eq!(status, StatusCode::OK);
    let value = loaded["value"].as_i64().unwrap();
    assert!((0..16).contains(&value));
    assert_eq!(loaded["blob"].as_str().unwrap().len(), 32 * 1024);
}

#[tokio::test]
async fn integers_beyond_64_bits_round_trip_exactly() {
    let (_dir, config, app) = test_app();
    let raw = r#"{"salary":123456789012345678901234567890,"x":-99999999999999999999}"#;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/ytd")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(raw))
        .unwrap();
    let (status, echoed) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        String::from_utf8(echoed).unwrap(),
        format!(r#"{{"status":"saved","data":{raw}}}"#)
    );

    let request = Request::builder().uri("/api/ytd").body(Body::empty()).unwrap();
    let (_, bytes) = send(&app, request).await;
    assert_eq!(String::from_utf8(bytes).unwrap(), raw);
    assert_eq!(fs::read_to_string(&config.ytd_file).unwrap(), raw);
}

#[tokio::test]
async fn unreadable_document_path_is_a_server_error() {
    let (_dir, config, app) = test_app();
    fs::create_dir(&config.ytd_file).unwrap();

    let (status, _) = get_json(&app, "/api/ytd").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = get_json(&app, "/api/contribution").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn post_without_content_type_is_parsed_as_json() {
    let (_dir, _config, app) = test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contribution")
        .body(Body::from(r#"{"type":"fixed","value":150}"#))
        .unwrap();
    let (status, bytes) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    let saved: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(saved["data"], json!({"type": "fixed", "value": 150}));

    let (_, loaded) = get_json(&app, "/api/contribution").await;
    assert_eq!(loaded, json!({"type": "fixed", "value": 150}));
}
