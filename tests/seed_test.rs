#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use carzone_api::entities::report::ReportStatus;
use carzone_api::entities::{buyer_profile, car_listing, report, user};
use carzone_api::seed::{self, SeedSummary};
use carzone_api::services::accounts::UserService;

const EXPECTED: SeedSummary = SeedSummary {
    users: 10,
    buyer_profiles: 4,
    seller_profiles: 5,
    cars: 10,
    car_listings: 10,
    favorites: 8,
    messages: 8,
    reports: 5,
    analytics: 7,
    search_logs: 15,
};

#[tokio::test]
async fn seed_loads_fixture_counts() {
    let db = common::test_db().await;
    let summary = seed::run(&db).await.unwrap();
    assert_eq!(summary, EXPECTED);
}

#[tokio::test]
async fn seed_is_idempotent() {
    let db = common::test_db().await;
    seed::run(&db).await.unwrap();
    let again = seed::run(&db).await.unwrap();
    assert_eq!(again, EXPECTED);
}

#[tokio::test]
async fn seeded_accounts_can_sign_in() {
    let db = common::test_db().await;
    seed::run(&db).await.unwrap();

    for (username, password) in seed::credentials(5) {
        let user = UserService::authenticate(&db, username, password).await.unwrap();
        assert!(user.is_active);
    }
}

#[tokio::test]
async fn seeded_rows_match_fixture() {
    let db = common::test_db().await;
    seed::run(&db).await.unwrap();

    let john = user::Entity::find()
        .filter(user::Column::Username.eq("john_buyer"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let profile = buyer_profile::Entity::find()
        .filter(buyer_profile::Column::UserId.eq(john.id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(profile.saved_searches.0.get("make").is_some());

    let sold = car_listing::Entity::find()
        .filter(car_listing::Column::Location.eq("Houston, TX"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sold.views, 54);
    assert_eq!(sold.price, Decimal::new(38_000, 0));

    let admin = user::Entity::find()
        .filter(user::Column::Username.eq("admin_user"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let reports = report::Entity::find().all(&db).await.unwrap();
    for r in &reports {
        if r.status == ReportStatus::Pending {
            assert!(r.reviewed_by_id.is_none());
        } else {
            assert_eq!(r.reviewed_by_id, Some(admin.id));
            assert!(r.reviewed_at.is_some());
        }
    }
    assert_eq!(
        reports.iter().filter(|r| r.status == ReportStatus::Pending).count(),
        2
    );
}
