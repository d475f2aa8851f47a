mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn health_root_returns_200() {
    let (app, _db) = common::test_app().await;
    let (status, json) = common::get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json.get("database").is_none());
}

#[tokio::test]
async fn health_api_reports_database() {
    let (app, _db) = common::test_app().await;
    let (status, json) = common::get(&app, "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "connected");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (app, _db) = common::test_app().await;
    let (status, _json) = common::get(&app, "/nonexistent").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
