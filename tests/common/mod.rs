#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use carzone_api::config::{Config, Environment};
use carzone_api::entities::car::{FuelType, Transmission};
use carzone_api::entities::user::Role;
use carzone_api::entities::{car, car_listing, user};
use carzone_api::services::accounts::{NewUser, UserService};
use carzone_api::services::catalog::{CarService, ListingService, NewCar, NewListing};
use carzone_api::state::AppState;

pub const PASSWORD: &str = "password123";

/// Fresh in-memory `SQLite` database with every migration applied.
pub async fn test_db() -> DatabaseConnection {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("apply migrations");
    db
}

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        server_host: std::net::IpAddr::from([127, 0, 0, 1]),
        server_port: 0,
        environment: Environment::Development,
        log_level: "warn".to_string(),
        jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
        jwt_access_expiration_secs: 900,
        frontend_url: "http://localhost:3000".to_string(),
    }
}

/// The app router plus a handle on its database for direct setup and assertions.
pub async fn test_app() -> (Router, DatabaseConnection) {
    let db = test_db().await;
    let state = AppState {
        db: db.clone(),
        config: test_config(),
    };
    (carzone_api::routes::router().with_state(state), db)
}

/// Send a request and return `(status, parsed JSON body)`. Empty bodies parse as `Null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&Value>,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .unwrap_or_default();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None, None, &[]).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, Some(token), None, &[]).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, "POST", uri, None, Some(body), &[]).await
}

pub async fn post_auth(app: &Router, uri: &str, token: &str, body: &Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(token), Some(body), &[]).await
}

pub async fn patch_auth(app: &Router, uri: &str, token: &str, body: &Value) -> (StatusCode, Value) {
    send(app, "PATCH", uri, Some(token), Some(body), &[]).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, Some(token), None, &[]).await
}

pub async fn create_user(db: &DatabaseConnection, username: &str, role: Role) -> user::Model {
    UserService::create(
        db,
        NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: PASSWORD.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role,
            phone_number: None,
            profile_picture: None,
            is_active: true,
        },
    )
    .await
    .expect("create user")
}

pub async fn create_car(db: &DatabaseConnection, make: &str, model: &str, year: i32) -> car::Model {
    CarService::create(
        db,
        NewCar {
            make: make.to_string(),
            model: model.to_string(),
            year,
            mileage: 20_000,
            fuel_type: FuelType::Petrol,
            transmission: Transmission::Automatic,
            color: "Silver".to_string(),
            engine_size: "2.0L".to_string(),
        },
    )
    .await
    .expect("create car")
}

pub async fn create_listing(
    db: &DatabaseConnection,
    car: &car::Model,
    seller: &user::Model,
    price: i64,
) -> car_listing::Model {
    ListingService::create(
        db,
        NewListing {
            car_id: car.id,
            seller_id: seller.id,
            price: Decimal::new(price, 0),
            description: format!("Well kept {}", car.label()),
            location: "Denver, CO".to_string(),
            status: car_listing::ListingStatus::Available,
        },
    )
    .await
    .expect("create listing")
}

/// Sign in through the API and return the bearer token.
pub async fn sign_in(app: &Router, login: &str) -> String {
    let (status, body) = post_json(
        app,
        "/api/v1/auth/signin",
        &serde_json::json!({ "login": login, "password": PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signin failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

/// Create an admin account and return it with a bearer token.
pub async fn admin_token(app: &Router, db: &DatabaseConnection) -> (user::Model, String) {
    let admin = create_user(db, "site_admin", Role::Admin).await;
    let token = sign_in(app, "site_admin").await;
    (admin, token)
}
