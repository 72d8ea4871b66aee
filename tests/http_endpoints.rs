//! Router tests for the pagination endpoints
//!
//! Requests go through the full axum stack without opening a socket.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use cursor_pagination::cli::{router, serve, AppContext};
use cursor_pagination::config::{AppConfig, StoreConfig};
use cursor_pagination::cursor::{CursorCodec, Position};
use cursor_pagination::store::{demo_books, MemoryStore};
use cursor_pagination::Error;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Arc;
use test_case::test_case;
use tower::ServiceExt;

fn app(count: usize) -> Router {
    let store = Arc::new(MemoryStore::with_records(demo_books("Book", count)));
    router(Arc::new(AppContext::new(store, "Book", 20)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn sort_keys(body: &Value) -> Vec<String> {
    body["books"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["sk"].as_str().unwrap().to_string())
        .collect()
}

fn token(body: &Value) -> Option<String> {
    body.get("nextPageToken")
        .and_then(Value::as_str)
        .map(str::to_string)
}

// ============================================================================
// Better pagination
// ============================================================================

#[tokio::test]
async fn test_better_pagination_forty_records() {
    let app = app(40);

    let (status, first) = get(&app, "/better-pagination").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sort_keys(&first).len(), 20);
    assert_eq!(sort_keys(&first)[0], "Book#00");
    assert_eq!(first["books"][0]["title"], "Book 0");
    let next = token(&first).expect("first page should carry a token");

    let (status, second) = get(&app, &format!("/better-pagination?nextPageToken={next}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sort_keys(&second)[0], "Book#20");
    assert_eq!(sort_keys(&second)[19], "Book#39");
    assert!(second.get("nextPageToken").is_none());
}

#[tokio::test]
async fn test_better_pagination_limit_twenty_five() {
    let app = app(40);

    let (_, first) = get(&app, "/better-pagination?limit=25").await;
    assert_eq!(sort_keys(&first).len(), 25);
    let next = token(&first).unwrap();
    assert_eq!(
        CursorCodec::decode(&next).unwrap(),
        Position::new("Book", "Book#24")
    );

    let (_, second) = get(&app, &format!("/better-pagination?limit=25&nextPageToken={next}")).await;
    assert_eq!(sort_keys(&second).len(), 15);
    assert!(token(&second).is_none());
}

#[test_case("limit=abc" ; "non numeric")]
#[test_case("limit=" ; "empty")]
#[test_case("limit=-3" ; "negative")]
#[test_case("limit=0" ; "zero")]
#[test_case("other=1" ; "missing")]
#[tokio::test]
async fn test_limit_falls_back_to_default(query: &str) {
    let app = app(40);
    let (status, body) = get(&app, &format!("/better-pagination?{query}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(sort_keys(&body).len(), 20);
}

#[tokio::test]
async fn test_empty_token_means_first_page() {
    let app = app(40);
    let (status, body) = get(&app, "/better-pagination?nextPageToken=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(sort_keys(&body)[0], "Book#00");
}

// ============================================================================
// Default pagination
// ============================================================================

#[tokio::test]
async fn test_default_pagination_trailing_empty_page() {
    let app = app(40);

    let (_, first) = get(&app, "/default-pagination").await;
    let (_, second) = get(
        &app,
        &format!("/default-pagination?nextPageToken={}", token(&first).unwrap()),
    )
    .await;
    assert_eq!(sort_keys(&second).len(), 20);

    // The store reported a continuation key after the last record
    let (status, third) = get(
        &app,
        &format!("/default-pagination?nextPageToken={}", token(&second).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(sort_keys(&third).is_empty());
    assert!(token(&third).is_none());
}

#[tokio::test]
async fn test_default_pagination_uneven_end() {
    let app = app(30);

    let (_, first) = get(&app, "/default-pagination").await;
    let (_, second) = get(
        &app,
        &format!("/default-pagination?nextPageToken={}", token(&first).unwrap()),
    )
    .await;

    assert_eq!(sort_keys(&second).len(), 10);
    assert!(token(&second).is_none());
}

// ============================================================================
// Errors and misc
// ============================================================================

#[test_case("/default-pagination" ; "default")]
#[test_case("/better-pagination" ; "better")]
#[tokio::test]
async fn test_malformed_token_is_bad_request(route: &str) {
    let app = app(40);
    let (status, body) = get(&app, &format!("{route}?nextPageToken=garbage!!")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Malformed cursor"));
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(&app(0), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_context_from_config_duckdb() {
    let config = AppConfig {
        store: StoreConfig::Duckdb { path: None },
        seed_count: 40,
        ..AppConfig::default()
    };
    let ctx = AppContext::from_config(&config).await.unwrap();
    assert_eq!(ctx.store().backend(), "duckdb");

    let app = router(Arc::new(ctx));
    let (_, first) = get(&app, "/better-pagination?limit=30").await;
    let (_, second) = get(
        &app,
        &format!("/better-pagination?limit=30&nextPageToken={}", token(&first).unwrap()),
    )
    .await;

    let mut all = sort_keys(&first);
    all.extend(sort_keys(&second));
    let expected: Vec<String> = demo_books("Book", 40).into_iter().map(|b| b.sk).collect();
    assert_eq!(all, expected);
}

#[tokio::test]
async fn test_context_requires_table_name() {
    let config = AppConfig {
        table_name: String::new(),
        ..AppConfig::default()
    };
    let err = AppContext::from_config(&config).await.err().unwrap();
    assert!(matches!(err, Error::MissingConfigField { ref field } if field == "table_name"));
}

#[tokio::test]
async fn test_serve_reports_port_in_use() {
    let taken = tokio::net::TcpListener::bind("0.0.0.0:0").await.unwrap();
    let mut config = AppConfig {
        seed_count: 0,
        ..AppConfig::default()
    };
    config.server.port = taken.local_addr().unwrap().port();

    let err = serve(&config).await.unwrap_err();

    assert!(matches!(err, Error::Other(_)));
    assert!(err
        .to_string()
        .starts_with(&format!("Failed to bind to port {}: IO error:", config.server.port)));
}
