#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use axum::http::StatusCode;
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};

use carzone_api::entities::car_listing::ListingStatus;
use carzone_api::entities::search_log;
use carzone_api::entities::user::Role;
use carzone_api::services::catalog::ListingService;

#[tokio::test]
async fn public_detail_counts_views() {
    let (app, db) = common::test_app().await;
    let seller = common::create_user(&db, "ace_motors", Role::Seller).await;
    let car = common::create_car(&db, "Toyota", "Camry", 2020).await;
    let listing = common::create_listing(&db, &car, &seller, 28_500).await;
    let uri = format!("/api/v1/listings/{}", listing.id);

    let (status, first) = common::get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["views"], 1);
    assert_eq!(first["carInfo"], "2020 Toyota Camry");

    let (_, second) = common::get(&app, &uri).await;
    assert_eq!(second["views"], 2);

    let (status, _) = common::get(&app, &format!("/api/v1/listings/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_is_logged_with_caller_and_ip() {
    let (app, db) = common::test_app().await;
    let buyer = common::create_user(&db, "john_buyer", Role::Buyer).await;
    let seller = common::create_user(&db, "premium_cars", Role::Seller).await;
    let camry = common::create_car(&db, "Toyota", "Camry", 2020).await;
    let civic = common::create_car(&db, "Honda", "Civic", 2019).await;
    common::create_listing(&db, &camry, &seller, 28_500).await;
    common::create_listing(&db, &civic, &seller, 22_000).await;
    let token = common::sign_in(&app, "john_buyer").await;

    let (status, page) = common::send(
        &app,
        "GET",
        "/api/v1/listings?q=Toyota",
        Some(&token),
        None,
        &[("x-forwarded-for", "10.0.0.100, 172.16.0.1")],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);

    let logs = search_log::Entity::find().all(&db).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].query, "Toyota");
    assert_eq!(logs[0].results_count, 1);
    assert_eq!(logs[0].user_id, Some(buyer.id));
    assert_eq!(logs[0].ip_address.as_deref(), Some("10.0.0.100"));
}

#[tokio::test]
async fn anonymous_search_is_logged_without_user() {
    let (app, db) = common::test_app().await;

    let (status, page) = common::get(&app, "/api/v1/listings?q=tesla&limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 0);
    assert_eq!(page["limit"], 5);

    let log = search_log::Entity::find()
        .order_by_desc(search_log::Column::Timestamp)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(log.query, "tesla");
    assert_eq!(log.results_count, 0);
    assert!(log.user_id.is_none());
    assert!(log.ip_address.is_none());
}

#[tokio::test]
async fn blank_search_is_not_logged() {
    let (app, db) = common::test_app().await;

    let (status, _) = common::get(&app, "/api/v1/listings").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = common::get(&app, "/api/v1/listings?q=%20%20").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(search_log::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn huge_offset_returns_empty_page() {
    let (app, db) = common::test_app().await;
    let seller = common::create_user(&db, "city_auto", Role::Seller).await;
    let car = common::create_car(&db, "Ford", "Focus", 2018).await;
    common::create_listing(&db, &car, &seller, 12_000).await;

    let (status, page) = common::get(&app, "/api/v1/listings?offset=18446744073709551615").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"].as_array().unwrap().len(), 0);
    assert_eq!(page["offset"], i64::MAX);
}

#[tokio::test]
async fn moderated_listings_stay_private() {
    let (app, db) = common::test_app().await;
    let seller = common::create_user(&db, "luxury_motors", Role::Seller).await;
    let bmw = common::create_car(&db, "BMW", "X5", 2021).await;
    let audi = common::create_car(&db, "Audi", "A4", 2020).await;
    let rejected = common::create_listing(&db, &bmw, &seller, 55_000).await;
    let sold = common::create_listing(&db, &audi, &seller, 31_000).await;
    ListingService::mark_as(&db, &[rejected.id], ListingStatus::Rejected)
        .await
        .unwrap();
    ListingService::mark_as(&db, &[sold.id], ListingStatus::Sold)
        .await
        .unwrap();

    let (status, _) = common::get(&app, "/api/v1/listings?status=rejected").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = common::get(&app, "/api/v1/listings?status=pending").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, page) = common::get(&app, "/api/v1/listings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 0);

    let (status, page) = common::get(&app, "/api/v1/listings?status=sold").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);

    let (status, _) = common::get(&app, &format!("/api/v1/listings/{}", rejected.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let hidden = ListingService::find(&db, rejected.id).await.unwrap();
    assert_eq!(hidden.views, 0);

    let (status, detail) = common::get(&app, &format!("/api/v1/listings/{}", sold.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["views"], 1);
}
