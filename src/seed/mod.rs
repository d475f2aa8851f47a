//! Idempotent development data loader.
//!
//! Every row is looked up by its natural key first and only inserted when missing, so the
//! loader can run repeatedly against the same store. Inserts go through the entity hooks,
//! which keeps seeded rows subject to the same validation as API writes.

pub mod data;

use std::fmt;

use anyhow::Context;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
};

use crate::entities::document::{Document, Tally};
use crate::entities::report::ReportStatus;
use crate::entities::user::Role;
use crate::entities::{
    analytics, buyer_profile, car, car_listing, favorite, message, report, search_log,
    seller_profile, user,
};
use crate::services::accounts::{
    NewBuyerProfile, NewSellerProfile, NewUser, ProfileService, UserService,
};
use crate::services::analytics::{AnalyticsService, NewAnalytics};
use crate::services::catalog::{CarService, NewCar};
use crate::services::favorites::{FavoriteService, NewFavorite};
use data::{SEED_PASSWORD, SeedTarget};

/// Row counts per table after a seed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: u64,
    pub buyer_profiles: u64,
    pub seller_profiles: u64,
    pub cars: u64,
    pub car_listings: u64,
    pub favorites: u64,
    pub messages: u64,
    pub reports: u64,
    pub analytics: u64,
    pub search_logs: u64,
}

impl SeedSummary {
    /// Count the rows currently stored in every table.
    ///
    /// # Errors
    ///
    /// Returns an error if any count query fails.
    pub async fn collect(db: &DatabaseConnection) -> anyhow::Result<Self> {
        Ok(Self {
            users: user::Entity::find().count(db).await?,
            buyer_profiles: buyer_profile::Entity::find().count(db).await?,
            seller_profiles: seller_profile::Entity::find().count(db).await?,
            cars: car::Entity::find().count(db).await?,
            car_listings: car_listing::Entity::find().count(db).await?,
            favorites: favorite::Entity::find().count(db).await?,
            messages: message::Entity::find().count(db).await?,
            reports: report::Entity::find().count(db).await?,
            analytics: analytics::Entity::find().count(db).await?,
            search_logs: search_log::Entity::find().count(db).await?,
        })
    }
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Users", self.users),
            ("Buyer Profiles", self.buyer_profiles),
            ("Seller Profiles", self.seller_profiles),
            ("Cars", self.cars),
            ("Car Listings", self.car_listings),
            ("Favorites", self.favorites),
            ("Messages", self.messages),
            ("Reports", self.reports),
            ("Analytics Entries", self.analytics),
            ("Search Logs", self.search_logs),
        ];
        for (label, count) in rows {
            writeln!(f, "  {label}: {count}")?;
        }
        Ok(())
    }
}

/// Seeded users split by role, in fixture order.
struct Accounts {
    all: Vec<user::Model>,
    admin: user::Model,
    buyers: Vec<user::Model>,
    sellers: Vec<user::Model>,
}

/// Load the development dataset and report the resulting table counts.
///
/// # Errors
///
/// Returns an error if any lookup or insert fails; rows written before the failure remain.
pub async fn run(db: &DatabaseConnection) -> anyhow::Result<SeedSummary> {
    let accounts = seed_users(db).await.context("seeding users")?;
    seed_profiles(db, &accounts).await.context("seeding profiles")?;
    let cars = seed_cars(db).await.context("seeding cars")?;
    let listings = seed_listings(db, &cars, &accounts.sellers)
        .await
        .context("seeding listings")?;
    seed_favorites(db, &accounts.buyers, &listings)
        .await
        .context("seeding favorites")?;
    seed_messages(db, &accounts, &listings)
        .await
        .context("seeding messages")?;
    seed_reports(db, &accounts, &listings)
        .await
        .context("seeding reports")?;
    seed_analytics(db).await.context("seeding analytics")?;
    seed_search_logs(db, &accounts.all)
        .await
        .context("seeding search logs")?;

    SeedSummary::collect(db).await
}

/// The first `n` seeded accounts as `(username, password)` pairs.
#[must_use]
pub fn credentials(n: usize) -> Vec<(&'static str, &'static str)> {
    data::USERS
        .iter()
        .take(n)
        .map(|seed| (seed.username, SEED_PASSWORD))
        .collect()
}

async fn seed_users(db: &DatabaseConnection) -> anyhow::Result<Accounts> {
    let mut all = Vec::with_capacity(data::USERS.len());
    for seed in &data::USERS {
        let existing = user::Entity::find()
            .filter(user::Column::Username.eq(seed.username))
            .one(db)
            .await?;
        let model = match existing {
            Some(model) => model,
            None => {
                let model = UserService::create(
                    db,
                    NewUser {
                        username: seed.username.to_string(),
                        email: seed.email.to_string(),
                        password: SEED_PASSWORD.to_string(),
                        first_name: seed.first_name.to_string(),
                        last_name: seed.last_name.to_string(),
                        role: seed.role,
                        phone_number: Some(seed.phone_number.to_string()),
                        profile_picture: None,
                        is_active: true,
                    },
                )
                .await?;
                tracing::info!(username = seed.username, "Created user");
                model
            }
        };
        all.push(model);
    }

    let by_role = |role: Role| -> Vec<user::Model> {
        all.iter().filter(|u| u.role == role).cloned().collect()
    };
    let buyers = by_role(Role::Buyer);
    let sellers = by_role(Role::Seller);
    let admin = all
        .iter()
        .find(|u| u.role == Role::Admin)
        .cloned()
        .context("fixture has no admin user")?;

    Ok(Accounts {
        all,
        admin,
        buyers,
        sellers,
    })
}

async fn seed_profiles(db: &DatabaseConnection, accounts: &Accounts) -> anyhow::Result<()> {
    for (buyer, searches) in accounts.buyers.iter().zip(data::BUYER_SEARCHES) {
        let exists = buyer_profile::Entity::find()
            .filter(buyer_profile::Column::UserId.eq(buyer.id))
            .one(db)
            .await?
            .is_some();
        if !exists {
            let saved_searches: Document = searches.iter().map(|&(k, v)| (k, v)).collect();
            ProfileService::create_buyer(
                db,
                NewBuyerProfile {
                    user_id: buyer.id,
                    saved_searches,
                },
            )
            .await?;
            tracing::info!(username = %buyer.username, "Created buyer profile");
        }
    }

    for (seller, (company, rating)) in accounts.sellers.iter().zip(data::SELLER_PROFILES) {
        let exists = seller_profile::Entity::find()
            .filter(seller_profile::Column::UserId.eq(seller.id))
            .one(db)
            .await?
            .is_some();
        if !exists {
            ProfileService::create_seller(
                db,
                NewSellerProfile {
                    user_id: seller.id,
                    company_name: Some(company.to_string()),
                    rating,
                },
            )
            .await?;
            tracing::info!(username = %seller.username, "Created seller profile");
        }
    }
    Ok(())
}

async fn seed_cars(db: &DatabaseConnection) -> anyhow::Result<Vec<car::Model>> {
    let mut cars = Vec::with_capacity(data::CARS.len());
    for seed in &data::CARS {
        let existing = car::Entity::find()
            .filter(car::Column::Make.eq(seed.make))
            .filter(car::Column::Model.eq(seed.model))
            .filter(car::Column::Year.eq(seed.year))
            .one(db)
            .await?;
        let model = match existing {
            Some(model) => model,
            None => {
                let model = CarService::create(
                    db,
                    NewCar {
                        make: seed.make.to_string(),
                        model: seed.model.to_string(),
                        year: seed.year,
                        mileage: seed.mileage,
                        fuel_type: seed.fuel_type,
                        transmission: seed.transmission,
                        color: seed.color.to_string(),
                        engine_size: seed.engine_size.to_string(),
                    },
                )
                .await?;
                tracing::info!(car = %model.label(), "Created car");
                model
            }
        };
        cars.push(model);
    }
    Ok(cars)
}

async fn seed_listings(
    db: &DatabaseConnection,
    cars: &[car::Model],
    sellers: &[user::Model],
) -> anyhow::Result<Vec<car_listing::Model>> {
    anyhow::ensure!(!sellers.is_empty(), "fixture has no seller users");

    let mut listings = Vec::with_capacity(data::LISTINGS.len());
    for (i, (seed, car)) in data::LISTINGS.iter().zip(cars).enumerate() {
        let seller = &sellers[i % sellers.len()];
        let existing = car_listing::Entity::find()
            .filter(car_listing::Column::CarId.eq(car.id))
            .filter(car_listing::Column::SellerId.eq(seller.id))
            .one(db)
            .await?;
        let model = match existing {
            Some(model) => model,
            None => {
                let model = car_listing::ActiveModel {
                    car_id: Set(car.id),
                    seller_id: Set(seller.id),
                    price: Set(Decimal::new(seed.price_cents, 2)),
                    description: Set(seed.description.to_string()),
                    location: Set(seed.location.to_string()),
                    status: Set(seed.status),
                    views: Set(seed.views),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                tracing::info!(car = %car.label(), seller = %seller.username, "Created listing");
                model
            }
        };
        listings.push(model);
    }
    Ok(listings)
}

async fn seed_favorites(
    db: &DatabaseConnection,
    buyers: &[user::Model],
    listings: &[car_listing::Model],
) -> anyhow::Result<()> {
    for &(buyer, listing) in &data::FAVORITES {
        let (Some(buyer), Some(listing)) = (buyers.get(buyer), listings.get(listing)) else {
            continue;
        };
        let (_, created) = FavoriteService::get_or_create(
            db,
            NewFavorite {
                user_id: buyer.id,
                listing_id: listing.id,
            },
        )
        .await?;
        if created {
            tracing::info!(username = %buyer.username, listing = %listing.id, "Created favorite");
        }
    }
    Ok(())
}

async fn seed_messages(
    db: &DatabaseConnection,
    accounts: &Accounts,
    listings: &[car_listing::Model],
) -> anyhow::Result<()> {
    for seed in &data::MESSAGES {
        let (Some(sender), Some(receiver), Some(listing)) = (
            accounts.buyers.get(seed.buyer),
            accounts.sellers.get(seed.seller),
            listings.get(seed.listing),
        ) else {
            continue;
        };
        let exists = message::Entity::find()
            .filter(message::Column::SenderId.eq(sender.id))
            .filter(message::Column::ReceiverId.eq(receiver.id))
            .filter(message::Column::ListingId.eq(listing.id))
            .filter(message::Column::Content.eq(seed.content))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }
        message::ActiveModel {
            sender_id: Set(sender.id),
            receiver_id: Set(receiver.id),
            listing_id: Set(Some(listing.id)),
            content: Set(seed.content.to_string()),
            is_read: Set(seed.is_read),
            ..Default::default()
        }
        .insert(db)
        .await?;
        tracing::info!(from = %sender.username, to = %receiver.username, "Created message");
    }
    Ok(())
}

async fn seed_reports(
    db: &DatabaseConnection,
    accounts: &Accounts,
    listings: &[car_listing::Model],
) -> anyhow::Result<()> {
    let reviewed_at: DateTimeWithTimeZone = (Utc::now() - Duration::days(1)).into();

    for seed in &data::REPORTS {
        let Some(reporter) = accounts.buyers.get(seed.buyer) else {
            continue;
        };
        let (listing_id, user_id) = match seed.target {
            SeedTarget::Listing(i) => (listings.get(i).map(|l| l.id), None),
            SeedTarget::Seller(i) => (None, accounts.sellers.get(i).map(|u| u.id)),
        };

        let mut select =
            report::Entity::find().filter(report::Column::ReporterId.eq(reporter.id));
        select = match (listing_id, user_id) {
            (Some(id), None) => select.filter(report::Column::ReportedListingId.eq(id)),
            (None, Some(id)) => select.filter(report::Column::ReportedUserId.eq(id)),
            _ => continue,
        };
        if select.one(db).await?.is_some() {
            continue;
        }

        let mut model = report::ActiveModel {
            reporter_id: Set(reporter.id),
            reported_listing_id: Set(listing_id),
            reported_user_id: Set(user_id),
            reason: Set(seed.reason),
            description: Set(seed.description.to_string()),
            status: Set(seed.status),
            ..Default::default()
        };
        if seed.status != ReportStatus::Pending {
            model.reviewed_by_id = Set(Some(accounts.admin.id));
            model.reviewed_at = Set(Some(reviewed_at));
        }
        model.insert(db).await?;
        tracing::info!(reporter = %reporter.username, reason = ?seed.reason, "Created report");
    }
    Ok(())
}

async fn seed_analytics(db: &DatabaseConnection) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();

    for i in 0..data::ANALYTICS_DAYS {
        let date = today - Duration::days(i64::from(i));
        let exists = analytics::Entity::find()
            .filter(analytics::Column::Date.eq(date))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }

        let offset = u64::from(i);
        let tally = |base: &[(&str, u64)]| -> Tally {
            base.iter().map(|&(k, n)| (k, n + offset)).collect()
        };
        let day = i32::try_from(i)?;

        AnalyticsService::create(
            db,
            NewAnalytics {
                date,
                new_users: 2 + day,
                new_listings: 1 + day,
                total_views: 50 + 10 * day,
                new_messages: 3 + day,
                new_reports: i32::from(i % 2 == 0),
                search_terms: tally(&data::SEARCH_TERMS),
                top_models: tally(&data::TOP_MODELS),
                popular_locations: tally(&data::POPULAR_LOCATIONS),
                revenue_data: Document::default(),
            },
        )
        .await?;
        tracing::info!(%date, "Created analytics entry");
    }
    Ok(())
}

async fn seed_search_logs(db: &DatabaseConnection, users: &[user::Model]) -> anyhow::Result<()> {
    for (i, query) in data::SEARCH_QUERIES.iter().enumerate() {
        let user_id = if i % 3 == 0 || users.is_empty() {
            None
        } else {
            Some(users[i % users.len()].id)
        };
        let ip = data::SEARCH_IPS[i % data::SEARCH_IPS.len()];
        let results_count = i32::try_from((i * 3) % 10 + 1)?;

        let mut select = search_log::Entity::find()
            .filter(search_log::Column::Query.eq(*query))
            .filter(search_log::Column::IpAddress.eq(ip));
        select = match user_id {
            Some(id) => select.filter(search_log::Column::UserId.eq(id)),
            None => select.filter(search_log::Column::UserId.is_null()),
        };
        if select.one(db).await?.is_some() {
            continue;
        }

        search_log::ActiveModel {
            query: Set((*query).to_string()),
            results_count: Set(results_count),
            user_id: Set(user_id),
            ip_address: Set(Some(ip.to_string())),
            ..Default::default()
        }
        .insert(db)
        .await?;
        tracing::info!(query, "Created search log");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::car_listing::ListingStatus;

    #[test]
    fn test_fixture_shapes() {
        let buyers = data::USERS.iter().filter(|u| u.role == Role::Buyer).count();
        let sellers = data::USERS.iter().filter(|u| u.role == Role::Seller).count();
        assert_eq!(buyers, 4);
        assert_eq!(sellers, data::SELLER_PROFILES.len());
        assert_eq!(data::CARS.len(), data::LISTINGS.len());
        assert!(data::FAVORITES.iter().all(|&(b, l)| b < buyers && l < data::LISTINGS.len()));
        assert!(
            data::MESSAGES
                .iter()
                .all(|m| m.buyer < buyers && m.seller < sellers && m.listing < data::LISTINGS.len())
        );
    }

    #[test]
    fn test_listing_statuses() {
        let sold = data::LISTINGS
            .iter()
            .filter(|l| l.status == ListingStatus::Sold)
            .count();
        let pending = data::LISTINGS
            .iter()
            .filter(|l| l.status == ListingStatus::Pending)
            .count();
        assert_eq!((sold, pending), (1, 1));
    }

    #[test]
    fn test_credentials() {
        let creds = credentials(5);
        assert_eq!(creds.len(), 5);
        assert_eq!(creds[0], ("admin_user", "password123"));
        assert_eq!(creds[4].0, "sarah_buyer");
    }

    #[test]
    fn test_summary_display() {
        let summary = SeedSummary {
            users: 10,
            ..SeedSummary::default()
        };
        let text = summary.to_string();
        assert!(text.contains("Users: 10"));
        assert!(text.contains("Search Logs: 0"));
    }
}
