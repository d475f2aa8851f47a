#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use axum::http::StatusCode;
use serde_json::json;

use carzone_api::entities::user::Role;
use carzone_api::services::accounts::{UserChanges, UserService};

#[tokio::test]
async fn signin_with_username_or_email() {
    let (app, db) = common::test_app().await;
    let user = common::create_user(&db, "john_buyer", Role::Buyer).await;

    let (status, body) = common::post_json(
        &app,
        "/api/v1/auth/signin",
        &json!({ "login": "john_buyer", "password": common::PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["id"], user.id.to_string());
    assert!(body["user"].get("passwordHash").is_none());

    let (status, _) = common::post_json(
        &app,
        "/api/v1/auth/signin",
        &json!({ "login": "JOHN_BUYER@example.com", "password": common::PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn signin_rejects_wrong_password_and_unknown_login() {
    let (app, db) = common::test_app().await;
    common::create_user(&db, "jane_buyer", Role::Buyer).await;

    for login in ["jane_buyer", "nobody"] {
        let (status, body) = common::post_json(
            &app,
            "/api/v1/auth/signin",
            &json!({ "login": login, "password": "wrong-password" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn signin_rejects_blank_fields() {
    let (app, _db) = common::test_app().await;
    let (status, _) = common::post_json(
        &app,
        "/api/v1/auth/signin",
        &json!({ "login": "  ", "password": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signin_rejects_inactive_account() {
    let (app, db) = common::test_app().await;
    let user = common::create_user(&db, "mike_buyer", Role::Buyer).await;
    UserService::update(
        &db,
        user.id,
        UserChanges {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let (status, _) = common::post_json(
        &app,
        "/api/v1/auth/signin",
        &json!({ "login": "mike_buyer", "password": common::PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_routes_require_token() {
    let (app, _db) = common::test_app().await;
    let (status, body) = common::get(&app, "/api/v1/admin/users").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = common::get_auth(&app, "/api/v1/admin/users", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_non_staff() {
    let (app, db) = common::test_app().await;
    common::create_user(&db, "sarah_buyer", Role::Buyer).await;
    let token = common::sign_in(&app, "sarah_buyer").await;

    let (status, body) = common::get_auth(&app, "/api/v1/admin/users", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn deactivated_admin_token_is_rejected() {
    let (app, db) = common::test_app().await;
    let (admin, token) = common::admin_token(&app, &db).await;

    let (status, _) = common::get_auth(&app, "/api/v1/admin/users", &token).await;
    assert_eq!(status, StatusCode::OK);

    UserService::update(
        &db,
        admin.id,
        UserChanges {
            is_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let (status, _) = common::get_auth(&app, "/api/v1/admin/users", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
