//! Domain rules enforced by the services and entity write hooks.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, PaginatorTrait};

use carzone_api::entities::car_listing::ListingStatus;
use carzone_api::entities::document::Tally;
use carzone_api::entities::report::{ReportReason, ReportStatus, ReportTarget};
use carzone_api::entities::user::Role;
use carzone_api::entities::{analytics, car_listing, favorite, message, report, search_log};
use carzone_api::error::AppError;
use carzone_api::services::Pagination;
use carzone_api::services::accounts::{
    NewSellerProfile, NewUser, ProfileService, SellerProfileChanges, UserChanges, UserService,
};
use carzone_api::services::analytics::{
    AnalyticsChanges, AnalyticsService, NewAnalytics, NewSearchLog, SearchLogService,
};
use carzone_api::services::catalog::{CarChanges, CarService, ListingChanges, ListingService};
use carzone_api::services::favorites::{FavoriteService, NewFavorite};
use carzone_api::services::messaging::{MessageService, NewMessage};
use carzone_api::services::moderation::{NewReport, ReportAction, ReportChanges, ReportService};

// ============ Accounts ============

#[tokio::test]
async fn user_phone_must_match_pattern() {
    let db = common::test_db().await;
    let result = UserService::create(
        &db,
        NewUser {
            username: "bad_phone".to_string(),
            email: "bad_phone@example.com".to_string(),
            password: common::PASSWORD.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::Buyer,
            phone_number: Some("12-34".to_string()),
            profile_picture: None,
            is_active: true,
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("+999999999")));
}

#[tokio::test]
async fn user_short_password_is_rejected() {
    let db = common::test_db().await;
    let result = UserService::create(
        &db,
        NewUser {
            username: "short_pw".to_string(),
            email: "short_pw@example.com".to_string(),
            password: "short".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::Buyer,
            phone_number: None,
            profile_picture: None,
            is_active: true,
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn duplicate_username_is_conflict() {
    let db = common::test_db().await;
    common::create_user(&db, "john_buyer", Role::Buyer).await;

    let result = UserService::create(
        &db,
        NewUser {
            username: "john_buyer".to_string(),
            email: "other@example.com".to_string(),
            password: common::PASSWORD.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            role: Role::Buyer,
            phone_number: None,
            profile_picture: None,
            is_active: true,
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn email_is_stored_lowercase_and_password_can_change() {
    let db = common::test_db().await;
    let user = common::create_user(&db, "case_user", Role::Buyer).await;

    let updated = UserService::update(
        &db,
        user.id,
        UserChanges {
            email: Some("  Case.User@Example.COM ".to_string()),
            password: Some("new-password-1".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.email, "case.user@example.com");

    assert!(
        UserService::authenticate(&db, "case_user", common::PASSWORD)
            .await
            .is_err()
    );
    assert!(
        UserService::authenticate(&db, "case.user@example.com", "new-password-1")
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn seller_rating_must_be_in_range() {
    let db = common::test_db().await;
    let seller = common::create_user(&db, "ace_motors", Role::Seller).await;

    let result = ProfileService::create_seller(
        &db,
        NewSellerProfile {
            user_id: seller.id,
            company_name: Some("Ace Motors LLC".to_string()),
            rating: 5.5,
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let profile = ProfileService::create_seller(
        &db,
        NewSellerProfile {
            user_id: seller.id,
            company_name: None,
            rating: 4.8,
        },
    )
    .await
    .unwrap();

    let result = ProfileService::update_seller(
        &db,
        profile.id,
        SellerProfileChanges {
            rating: Some(-0.1),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn one_seller_profile_per_user() {
    let db = common::test_db().await;
    let seller = common::create_user(&db, "city_auto", Role::Seller).await;
    let input = NewSellerProfile {
        user_id: seller.id,
        company_name: None,
        rating: 4.2,
    };

    ProfileService::create_seller(&db, input.clone()).await.unwrap();
    let result = ProfileService::create_seller(&db, input).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

// ============ Catalog ============

#[tokio::test]
async fn car_year_and_mileage_are_validated() {
    let db = common::test_db().await;
    let car = common::create_car(&db, "Toyota", "Camry", 2020).await;

    let result = CarService::update(
        &db,
        car.id,
        CarChanges {
            year: Some(1899),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("1900")));

    let result = CarService::update(
        &db,
        car.id,
        CarChanges {
            mileage: Some(-1),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn listing_price_must_be_non_negative() {
    let db = common::test_db().await;
    let seller = common::create_user(&db, "premium_cars", Role::Seller).await;
    let car = common::create_car(&db, "BMW", "3 Series", 2021).await;
    let listing = common::create_listing(&db, &car, &seller, 35_000).await;

    let result = ListingService::update(
        &db,
        listing.id,
        ListingChanges {
            price: Some(Decimal::new(-1, 0)),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn new_listing_defaults() {
    let db = common::test_db().await;
    let seller = common::create_user(&db, "budget_cars", Role::Seller).await;
    let car = common::create_car(&db, "Volkswagen", "Jetta", 2019).await;
    let listing = common::create_listing(&db, &car, &seller, 21_000).await;

    assert_eq!(listing.status, ListingStatus::Available);
    assert_eq!(listing.views, 0);
    assert_eq!(listing.price, Decimal::new(21_000, 0));
}

#[tokio::test]
async fn increment_views_adds_one_per_call() {
    let db = common::test_db().await;
    let seller = common::create_user(&db, "luxury_motors", Role::Seller).await;
    let car = common::create_car(&db, "Tesla", "Model 3", 2022).await;
    let listing = common::create_listing(&db, &car, &seller, 42_000).await;

    for _ in 0..5 {
        ListingService::increment_views(&db, listing.id).await.unwrap();
    }

    let reloaded = ListingService::find(&db, listing.id).await.unwrap();
    assert_eq!(reloaded.views, 5);
    assert_eq!(reloaded.price, listing.price);
    assert_eq!(reloaded.status, listing.status);

    let missing = ListingService::increment_views(&db, uuid::Uuid::new_v4()).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn listing_search_defaults_to_available() {
    let db = common::test_db().await;
    let seller = common::create_user(&db, "ace_motors", Role::Seller).await;
    let camry = common::create_car(&db, "Toyota", "Camry", 2020).await;
    let civic = common::create_car(&db, "Honda", "Civic", 2019).await;
    common::create_listing(&db, &camry, &seller, 28_500).await;
    let sold = common::create_listing(&db, &civic, &seller, 22_000).await;
    ListingService::mark_as(&db, &[sold.id], ListingStatus::Sold)
        .await
        .unwrap();

    let page = ListingService::search(&db, None, None, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].car_info, "2020 Toyota Camry");

    let page = ListingService::search(&db, Some("honda"), Some(ListingStatus::Sold), Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);

    let page = ListingService::search(&db, Some("tesla"), None, Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

// ============ Favorites ============

#[tokio::test]
async fn favorite_get_or_create_is_idempotent() {
    let db = common::test_db().await;
    let buyer = common::create_user(&db, "john_buyer", Role::Buyer).await;
    let seller = common::create_user(&db, "ace_motors", Role::Seller).await;
    let car = common::create_car(&db, "Toyota", "Camry", 2020).await;
    let listing = common::create_listing(&db, &car, &seller, 28_500).await;
    let input = NewFavorite {
        user_id: buyer.id,
        listing_id: listing.id,
    };

    let (first, created) = FavoriteService::get_or_create(&db, input.clone()).await.unwrap();
    assert!(created);
    let (second, created) = FavoriteService::get_or_create(&db, input).await.unwrap();
    assert!(!created);
    assert_eq!(first.id, second.id);
    assert_eq!(favorite::Entity::find().count(&db).await.unwrap(), 1);
}

// ============ Messaging ============

#[tokio::test]
async fn message_sender_and_receiver_must_differ() {
    let db = common::test_db().await;
    let user = common::create_user(&db, "jane_buyer", Role::Buyer).await;

    let result = MessageService::send(
        &db,
        NewMessage {
            sender_id: user.id,
            receiver_id: user.id,
            listing_id: None,
            content: "Talking to myself".to_string(),
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("cannot be the same")));
}

#[tokio::test]
async fn mark_as_read_changes_only_once() {
    let db = common::test_db().await;
    let buyer = common::create_user(&db, "mike_buyer", Role::Buyer).await;
    let seller = common::create_user(&db, "city_auto", Role::Seller).await;
    let sent = MessageService::send(
        &db,
        NewMessage {
            sender_id: buyer.id,
            receiver_id: seller.id,
            listing_id: None,
            content: "Is financing available?".to_string(),
        },
    )
    .await
    .unwrap();
    assert!(!sent.is_read);

    assert!(MessageService::mark_as_read(&db, sent.id).await.unwrap());
    assert!(!MessageService::mark_as_read(&db, sent.id).await.unwrap());
    assert!(MessageService::find(&db, sent.id).await.unwrap().is_read);

    let missing = MessageService::mark_as_read(&db, uuid::Uuid::new_v4()).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn bulk_read_state_counts_rows() {
    let db = common::test_db().await;
    let buyer = common::create_user(&db, "sarah_buyer", Role::Buyer).await;
    let seller = common::create_user(&db, "budget_cars", Role::Seller).await;
    let mut ids = Vec::new();
    for content in ["first", "second"] {
        let sent = MessageService::send(
            &db,
            NewMessage {
                sender_id: buyer.id,
                receiver_id: seller.id,
                listing_id: None,
                content: content.to_string(),
            },
        )
        .await
        .unwrap();
        ids.push(sent.id);
    }

    let outcome = MessageService::mark_read_state(&db, &ids, true).await.unwrap();
    assert_eq!(outcome.updated, 2);
    assert_eq!(outcome.message, "2 message(s) marked as read.");

    let outcome = MessageService::mark_read_state(&db, &ids[..1], false).await.unwrap();
    assert_eq!(outcome.message, "1 message(s) marked as unread.");
    assert!(!MessageService::find(&db, ids[0]).await.unwrap().is_read);
}

// ============ Moderation ============

#[tokio::test]
async fn report_needs_exactly_one_target() {
    let db = common::test_db().await;
    let reporter = common::create_user(&db, "john_buyer", Role::Buyer).await;
    let seller = common::create_user(&db, "ace_motors", Role::Seller).await;
    let car = common::create_car(&db, "Ford", "F-150", 2020).await;
    let listing = common::create_listing(&db, &car, &seller, 38_000).await;

    let neither = report::ActiveModel {
        reporter_id: Set(reporter.id),
        reported_listing_id: Set(None),
        reported_user_id: Set(None),
        reason: Set(ReportReason::Spam),
        ..Default::default()
    }
    .insert(&db)
    .await;
    assert!(matches!(AppError::from(neither.unwrap_err()), AppError::Validation(_)));

    let both = report::ActiveModel {
        reporter_id: Set(reporter.id),
        reported_listing_id: Set(Some(listing.id)),
        reported_user_id: Set(Some(seller.id)),
        reason: Set(ReportReason::Spam),
        ..Default::default()
    }
    .insert(&db)
    .await;
    assert!(matches!(AppError::from(both.unwrap_err()), AppError::Validation(_)));

    let created = ReportService::create(
        &db,
        NewReport {
            reporter_id: reporter.id,
            target: ReportTarget::Listing(listing.id),
            reason: ReportReason::Fake,
            description: "Already sold".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(created.status, ReportStatus::Pending);
    assert_eq!(created.target(), Some(ReportTarget::Listing(listing.id)));
}

#[tokio::test]
async fn users_cannot_report_themselves() {
    let db = common::test_db().await;
    let reporter = common::create_user(&db, "jane_buyer", Role::Buyer).await;

    let result = ReportService::create(
        &db,
        NewReport {
            reporter_id: reporter.id,
            target: ReportTarget::User(reporter.id),
            reason: ReportReason::Other,
            description: String::new(),
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("themselves")));
}

#[tokio::test]
async fn report_edit_out_of_pending_stamps_reviewer() {
    let db = common::test_db().await;
    let admin = common::create_user(&db, "admin_user", Role::Admin).await;
    let reporter = common::create_user(&db, "mike_buyer", Role::Buyer).await;
    let seller = common::create_user(&db, "city_auto", Role::Seller).await;
    let created = ReportService::create(
        &db,
        NewReport {
            reporter_id: reporter.id,
            target: ReportTarget::User(seller.id),
            reason: ReportReason::Scam,
            description: String::new(),
        },
    )
    .await
    .unwrap();

    let notes_only = ReportService::update(
        &db,
        created.id,
        ReportChanges {
            admin_notes: Some("Checking".to_string()),
            ..Default::default()
        },
        &admin,
    )
    .await
    .unwrap();
    assert!(notes_only.reviewed_by_id.is_none());

    let reviewed = ReportService::update(
        &db,
        created.id,
        ReportChanges {
            status: Some(ReportStatus::Resolved),
            ..Default::default()
        },
        &admin,
    )
    .await
    .unwrap();
    assert_eq!(reviewed.reviewed_by_id, Some(admin.id));
    assert!(reviewed.reviewed_at.is_some());
}

#[tokio::test]
async fn resending_same_status_does_not_stamp_reviewer() {
    let db = common::test_db().await;
    let admin = common::create_user(&db, "admin_user", Role::Admin).await;
    let reporter = common::create_user(&db, "john_buyer", Role::Buyer).await;
    let seller = common::create_user(&db, "budget_cars", Role::Seller).await;
    let created = ReportService::create(
        &db,
        NewReport {
            reporter_id: reporter.id,
            target: ReportTarget::User(seller.id),
            reason: ReportReason::Spam,
            description: String::new(),
        },
    )
    .await
    .unwrap();

    let mut active = created.into_active_model();
    active.status = Set(ReportStatus::Dismissed);
    let dismissed = active.update(&db).await.unwrap();
    assert!(dismissed.reviewed_by_id.is_none());

    let unchanged = ReportService::update(
        &db,
        dismissed.id,
        ReportChanges {
            status: Some(ReportStatus::Dismissed),
            ..Default::default()
        },
        &admin,
    )
    .await
    .unwrap();
    assert!(unchanged.reviewed_by_id.is_none());
    assert!(unchanged.reviewed_at.is_none());

    let resolved = ReportService::update(
        &db,
        dismissed.id,
        ReportChanges {
            status: Some(ReportStatus::Resolved),
            ..Default::default()
        },
        &admin,
    )
    .await
    .unwrap();
    assert_eq!(resolved.reviewed_by_id, Some(admin.id));
}

#[tokio::test]
async fn bulk_report_actions_respect_eligibility() {
    let db = common::test_db().await;
    let admin = common::create_user(&db, "admin_user", Role::Admin).await;
    let reporter = common::create_user(&db, "sarah_buyer", Role::Buyer).await;
    let seller = common::create_user(&db, "luxury_motors", Role::Seller).await;

    let mut ids = Vec::new();
    for reason in [ReportReason::Spam, ReportReason::Scam, ReportReason::Offensive] {
        let created = ReportService::create(
            &db,
            NewReport {
                reporter_id: reporter.id,
                target: ReportTarget::User(seller.id),
                reason,
                description: String::new(),
            },
        )
        .await
        .unwrap();
        ids.push(created.id);
    }
    ReportService::apply(&db, &ids[..1], ReportAction::MarkResolved, &admin)
        .await
        .unwrap();

    let outcome = ReportService::apply(&db, &ids, ReportAction::MarkReviewed, &admin)
        .await
        .unwrap();
    assert_eq!(outcome.updated, 2);
    assert_eq!(outcome.message, "2 report(s) marked as reviewed.");
    assert_eq!(
        ReportService::find(&db, ids[0]).await.unwrap().status,
        ReportStatus::Resolved
    );

    let outcome = ReportService::apply(&db, &ids, ReportAction::MarkResolved, &admin)
        .await
        .unwrap();
    assert_eq!(outcome.updated, 2);

    for id in &ids {
        let stored = ReportService::find(&db, *id).await.unwrap();
        assert_eq!(stored.status, ReportStatus::Resolved);
        assert_eq!(stored.reviewed_by_id, Some(admin.id));
        assert!(stored.reviewed_at.is_some());
    }
}

// ============ Analytics ============

#[tokio::test]
async fn analytics_get_or_create_for_date() {
    let db = common::test_db().await;
    let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

    let (first, created) = AnalyticsService::get_or_create_for_date(&db, Some(date))
        .await
        .unwrap();
    assert!(created);
    assert_eq!(first.new_users, 0);
    assert!(first.search_terms.0.is_empty());

    let (second, created) = AnalyticsService::get_or_create_for_date(&db, Some(date))
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(first.id, second.id);

    let (today, _) = AnalyticsService::get_or_create_for_date(&db, None).await.unwrap();
    assert_eq!(today.date, chrono::Utc::now().date_naive());
    assert_eq!(analytics::Entity::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn analytics_counters_and_date_are_guarded() {
    let db = common::test_db().await;
    let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let created = AnalyticsService::create(
        &db,
        NewAnalytics {
            date,
            new_users: 2,
            new_listings: 1,
            total_views: 50,
            new_messages: 3,
            new_reports: 1,
            search_terms: [("toyota", 15), ("honda", 12)].into_iter().collect::<Tally>(),
            top_models: Tally::default(),
            popular_locations: Tally::default(),
            revenue_data: Default::default(),
        },
    )
    .await
    .unwrap();

    let result = AnalyticsService::update(
        &db,
        created.id,
        AnalyticsChanges {
            total_views: Some(-5),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let mut active = created.clone().into_active_model();
    active.date = Set(NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
    let moved = active.update(&db).await;
    assert!(matches!(AppError::from(moved.unwrap_err()), AppError::Validation(_)));

    let duplicate = AnalyticsService::get_or_create_for_date(&db, Some(date))
        .await
        .unwrap();
    assert_eq!(duplicate.0.id, created.id);
}

#[tokio::test]
async fn search_logs_are_immutable() {
    let db = common::test_db().await;
    let logged = SearchLogService::record(
        &db,
        NewSearchLog {
            query: "Toyota Camry 2020".to_string(),
            results_count: 3,
            user_id: None,
            ip_address: "192.168.1.100".parse().ok(),
        },
    )
    .await
    .unwrap();
    assert_eq!(logged.ip_address.as_deref(), Some("192.168.1.100"));

    let mut active = logged.into_active_model();
    active.results_count = Set(10);
    let result = active.update(&db).await;
    assert!(matches!(AppError::from(result.unwrap_err()), AppError::Validation(_)));
}

// ============ Cascades ============

#[tokio::test]
async fn deleting_a_seller_cascades_to_their_listings() {
    let db = common::test_db().await;
    let buyer = common::create_user(&db, "john_buyer", Role::Buyer).await;
    let seller = common::create_user(&db, "ace_motors", Role::Seller).await;
    let car = common::create_car(&db, "Toyota", "Camry", 2020).await;
    let listing = common::create_listing(&db, &car, &seller, 28_500).await;

    FavoriteService::get_or_create(
        &db,
        NewFavorite {
            user_id: buyer.id,
            listing_id: listing.id,
        },
    )
    .await
    .unwrap();
    MessageService::send(
        &db,
        NewMessage {
            sender_id: buyer.id,
            receiver_id: seller.id,
            listing_id: Some(listing.id),
            content: "Still available?".to_string(),
        },
    )
    .await
    .unwrap();
    ReportService::create(
        &db,
        NewReport {
            reporter_id: buyer.id,
            target: ReportTarget::Listing(listing.id),
            reason: ReportReason::Fake,
            description: String::new(),
        },
    )
    .await
    .unwrap();

    UserService::delete(&db, seller.id).await.unwrap();

    assert_eq!(car_listing::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(favorite::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(message::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(report::Entity::find().count(&db).await.unwrap(), 0);
    assert!(CarService::find(&db, car.id).await.is_ok());
}

#[tokio::test]
async fn deleting_a_reviewer_or_searcher_keeps_history() {
    let db = common::test_db().await;
    let admin = common::create_user(&db, "admin_user", Role::Admin).await;
    let reporter = common::create_user(&db, "jane_buyer", Role::Buyer).await;
    let seller = common::create_user(&db, "premium_cars", Role::Seller).await;
    let created = ReportService::create(
        &db,
        NewReport {
            reporter_id: reporter.id,
            target: ReportTarget::User(seller.id),
            reason: ReportReason::Scam,
            description: String::new(),
        },
    )
    .await
    .unwrap();
    ReportService::apply(&db, &[created.id], ReportAction::MarkReviewed, &admin)
        .await
        .unwrap();
    let logged = SearchLogService::record(
        &db,
        NewSearchLog {
            query: "electric cars".to_string(),
            results_count: 1,
            user_id: Some(admin.id),
            ip_address: None,
        },
    )
    .await
    .unwrap();

    UserService::delete(&db, admin.id).await.unwrap();

    let kept = ReportService::find(&db, created.id).await.unwrap();
    assert_eq!(kept.status, ReportStatus::Reviewed);
    assert!(kept.reviewed_by_id.is_none());

    let log = search_log::Entity::find_by_id(logged.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(log.user_id.is_none());
}

#[tokio::test]
async fn deleting_a_car_removes_its_listings() {
    let db = common::test_db().await;
    let seller = common::create_user(&db, "city_auto", Role::Seller).await;
    let car = common::create_car(&db, "Audi", "A4", 2019).await;
    common::create_listing(&db, &car, &seller, 32_000).await;

    CarService::delete(&db, car.id).await.unwrap();
    assert_eq!(car_listing::Entity::find().count(&db).await.unwrap(), 0);
}
