//! Batch loaders and search subqueries shared by the list endpoints.

use std::collections::HashMap;

use sea_orm::sea_query::{Query, SelectStatement};
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{car, car_listing, user};

/// Load users by id in one query.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn users<C>(
    db: &C,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, user::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let ids: Vec<Uuid> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect())
}

/// Load cars by id in one query.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn cars<C>(
    db: &C,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, car::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let ids: Vec<Uuid> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(car::Entity::find()
        .filter(car::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect())
}

/// A listing together with its car.
#[derive(Debug, Clone)]
pub struct ListingWithCar {
    pub listing: car_listing::Model,
    pub car: Option<car::Model>,
}

impl ListingWithCar {
    /// `"{year} {make} {model} - ${price}"`, the listing label used by admin rows.
    #[must_use]
    pub fn label(&self) -> String {
        let car = self
            .car
            .as_ref()
            .map_or_else(|| "Unknown car".to_string(), car::Model::label);
        format!("{car} - ${}", self.listing.price)
    }
}

/// Load listings, with their cars, by id.
///
/// # Errors
///
/// Returns an error if a query fails.
pub async fn listings<C>(
    db: &C,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, ListingWithCar>, DbErr>
where
    C: ConnectionTrait,
{
    let ids: Vec<Uuid> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let listings = car_listing::Entity::find()
        .filter(car_listing::Column::Id.is_in(ids))
        .all(db)
        .await?;
    let cars = cars(db, listings.iter().map(|l| l.car_id)).await?;

    Ok(listings
        .into_iter()
        .map(|listing| {
            let car = cars.get(&listing.car_id).cloned();
            (listing.id, ListingWithCar { listing, car })
        })
        .collect())
}

/// `SELECT id FROM user WHERE username/email LIKE %q%`.
#[must_use]
pub fn users_matching(q: &str) -> SelectStatement {
    Query::select()
        .column(user::Column::Id)
        .from(user::Entity)
        .cond_where(
            Condition::any()
                .add(user::Column::Username.contains(q))
                .add(user::Column::Email.contains(q)),
        )
        .to_owned()
}

/// `SELECT id FROM car WHERE make/model LIKE %q%`.
#[must_use]
pub fn cars_matching(q: &str) -> SelectStatement {
    Query::select()
        .column(car::Column::Id)
        .from(car::Entity)
        .cond_where(
            Condition::any()
                .add(car::Column::Make.contains(q))
                .add(car::Column::Model.contains(q)),
        )
        .to_owned()
}

/// `SELECT id FROM car_listing WHERE car_id IN (cars matching q)`.
#[must_use]
pub fn listings_matching(q: &str) -> SelectStatement {
    Query::select()
        .column(car_listing::Column::Id)
        .from(car_listing::Entity)
        .and_where(car_listing::Column::CarId.in_subquery(cars_matching(q)))
        .to_owned()
}

/// `SELECT id FROM car_listing WHERE status = ?`.
#[must_use]
pub fn listings_with_status(status: car_listing::ListingStatus) -> SelectStatement {
    Query::select()
        .column(car_listing::Column::Id)
        .from(car_listing::Entity)
        .and_where(car_listing::Column::Status.eq(status))
        .to_owned()
}
