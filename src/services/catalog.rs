use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BulkOutcome, Page, Pagination, lookup, paginate, search_term};
use crate::entities::car::{self, FuelType, Transmission};
use crate::entities::car_listing::{self, ListingStatus};
use crate::entities::favorite;
use crate::error::AppError;

// ─────────────────────────────────────────────────────────────────────────────
// Inputs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCar {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i32,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub color: String,
    pub engine_size: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarChanges {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub mileage: Option<i32>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub color: Option<String>,
    pub engine_size: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarFilter {
    pub q: Option<String>,
    pub make: Option<String>,
    pub fuel_type: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub car_id: Uuid,
    pub seller_id: Uuid,
    pub price: Decimal,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub status: ListingStatus,
}

/// Editable listing fields. `views` is deliberately absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingChanges {
    pub car_id: Option<Uuid>,
    pub seller_id: Option<Uuid>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: Option<ListingStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingFilter {
    pub q: Option<String>,
    pub status: Option<ListingStatus>,
    pub make: Option<String>,
    pub fuel_type: Option<FuelType>,
    pub seller_id: Option<Uuid>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Outputs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarRow {
    #[serde(flatten)]
    pub car: car::Model,
    pub listing_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDetail {
    #[serde(flatten)]
    pub car: car::Model,
    pub listings: Vec<car_listing::Model>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRow {
    #[serde(flatten)]
    pub listing: car_listing::Model,
    pub car_info: String,
    pub seller: String,
    pub favorites_count: u64,
}

/// Count child rows per parent id with a single grouped query.
async fn count_by<E, C>(
    db: &C,
    column: E::Column,
    ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, u64>, AppError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, i64)> = E::find()
        .select_only()
        .column(column)
        .column_as(Expr::col(column).count(), "count")
        .filter(column.is_in(ids))
        .group_by(column)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, count)| (id, u64::try_from(count).unwrap_or_default()))
        .collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// Cars
// ─────────────────────────────────────────────────────────────────────────────

pub struct CarService;

impl CarService {
    /// List cars by year (newest first), then make and model.
    pub async fn list(
        db: &DatabaseConnection,
        filter: &CarFilter,
        pagination: Pagination,
    ) -> Result<Page<CarRow>, AppError> {
        let mut select = car::Entity::find()
            .order_by_desc(car::Column::Year)
            .order_by_asc(car::Column::Make)
            .order_by_asc(car::Column::Model);

        if let Some(q) = search_term(filter.q.as_deref()) {
            select = select.filter(
                Condition::any()
                    .add(car::Column::Make.contains(q))
                    .add(car::Column::Model.contains(q))
                    .add(car::Column::Color.contains(q)),
            );
        }
        if let Some(make) = &filter.make {
            select = select.filter(car::Column::Make.eq(make.as_str()));
        }
        if let Some(fuel_type) = filter.fuel_type {
            select = select.filter(car::Column::FuelType.eq(fuel_type));
        }
        if let Some(transmission) = filter.transmission {
            select = select.filter(car::Column::Transmission.eq(transmission));
        }
        if let Some(year) = filter.year {
            select = select.filter(car::Column::Year.eq(year));
        }

        let page = paginate(db, select, pagination).await?;
        let counts = count_by::<car_listing::Entity, _>(
            db,
            car_listing::Column::CarId,
            page.items.iter().map(|c| c.id).collect(),
        )
        .await?;

        Ok(page.map(|car| CarRow {
            listing_count: counts.get(&car.id).copied().unwrap_or_default(),
            car,
        }))
    }

    pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<car::Model, AppError> {
        car::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Car {id} not found.")))
    }

    /// A car with all of its listings, newest first.
    pub async fn detail(db: &DatabaseConnection, id: Uuid) -> Result<CarDetail, AppError> {
        let car = Self::find(db, id).await?;
        let listings = car
            .find_related(car_listing::Entity)
            .order_by_desc(car_listing::Column::CreatedAt)
            .all(db)
            .await?;
        Ok(CarDetail { car, listings })
    }

    pub async fn create(db: &DatabaseConnection, input: NewCar) -> Result<car::Model, AppError> {
        let model = car::ActiveModel {
            make: Set(input.make),
            model: Set(input.model),
            year: Set(input.year),
            mileage: Set(input.mileage),
            fuel_type: Set(input.fuel_type),
            transmission: Set(input.transmission),
            color: Set(input.color),
            engine_size: Set(input.engine_size),
            ..Default::default()
        };
        Ok(model.insert(db).await?)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: CarChanges,
    ) -> Result<car::Model, AppError> {
        let mut active = Self::find(db, id).await?.into_active_model();

        if let Some(make) = changes.make {
            active.make = Set(make);
        }
        if let Some(model) = changes.model {
            active.model = Set(model);
        }
        if let Some(year) = changes.year {
            active.year = Set(year);
        }
        if let Some(mileage) = changes.mileage {
            active.mileage = Set(mileage);
        }
        if let Some(fuel_type) = changes.fuel_type {
            active.fuel_type = Set(fuel_type);
        }
        if let Some(transmission) = changes.transmission {
            active.transmission = Set(transmission);
        }
        if let Some(color) = changes.color {
            active.color = Set(color);
        }
        if let Some(engine_size) = changes.engine_size {
            active.engine_size = Set(engine_size);
        }

        Ok(active.update(db).await?)
    }

    /// Delete a car and, through the foreign key, all of its listings.
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
        let result = car::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Car {id} not found.")));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Listings
// ─────────────────────────────────────────────────────────────────────────────

pub struct ListingService;

impl ListingService {
    /// Attach car label, seller username and favorite count to a page of listings.
    async fn rows(
        db: &DatabaseConnection,
        page: Page<car_listing::Model>,
    ) -> Result<Page<ListingRow>, AppError> {
        let cars = lookup::cars(db, page.items.iter().map(|l| l.car_id)).await?;
        let sellers = lookup::users(db, page.items.iter().map(|l| l.seller_id)).await?;
        let favorites = count_by::<favorite::Entity, _>(
            db,
            favorite::Column::ListingId,
            page.items.iter().map(|l| l.id).collect(),
        )
        .await?;

        Ok(page.map(|listing| ListingRow {
            car_info: cars
                .get(&listing.car_id)
                .map(car::Model::label)
                .unwrap_or_default(),
            seller: sellers
                .get(&listing.seller_id)
                .map(|u| u.username.clone())
                .unwrap_or_default(),
            favorites_count: favorites.get(&listing.id).copied().unwrap_or_default(),
            listing,
        }))
    }

    /// List listings, newest first.
    ///
    /// `q` matches car make or model, seller username or email, location and description.
    pub async fn list(
        db: &DatabaseConnection,
        filter: &ListingFilter,
        pagination: Pagination,
    ) -> Result<Page<ListingRow>, AppError> {
        let mut select = car_listing::Entity::find().order_by_desc(car_listing::Column::CreatedAt);

        if let Some(q) = search_term(filter.q.as_deref()) {
            select = select.filter(
                Condition::any()
                    .add(car_listing::Column::CarId.in_subquery(lookup::cars_matching(q)))
                    .add(car_listing::Column::SellerId.in_subquery(lookup::users_matching(q)))
                    .add(car_listing::Column::Location.contains(q))
                    .add(car_listing::Column::Description.contains(q)),
            );
        }
        if let Some(status) = filter.status {
            select = select.filter(car_listing::Column::Status.eq(status));
        }
        if let Some(make) = &filter.make {
            select = select.filter(
                car_listing::Column::CarId.in_subquery(
                    Query::select()
                        .column(car::Column::Id)
                        .from(car::Entity)
                        .and_where(car::Column::Make.eq(make.as_str()))
                        .to_owned(),
                ),
            );
        }
        if let Some(fuel_type) = filter.fuel_type {
            select = select.filter(
                car_listing::Column::CarId.in_subquery(
                    Query::select()
                        .column(car::Column::Id)
                        .from(car::Entity)
                        .and_where(car::Column::FuelType.eq(fuel_type))
                        .to_owned(),
                ),
            );
        }
        if let Some(seller_id) = filter.seller_id {
            select = select.filter(car_listing::Column::SellerId.eq(seller_id));
        }

        let page = paginate(db, select, pagination).await?;
        Self::rows(db, page).await
    }

    /// Public search: available listings unless `sold` is asked for.
    ///
    /// `q` matches make, model, location and description. Pending and rejected
    /// listings are never searchable.
    pub async fn search(
        db: &DatabaseConnection,
        q: Option<&str>,
        status: Option<ListingStatus>,
        pagination: Pagination,
    ) -> Result<Page<ListingRow>, AppError> {
        let status = status.unwrap_or_default();
        if !status.is_public() {
            return Err(AppError::BadRequest(format!(
                "Listings with status '{}' are not searchable.",
                status.as_str()
            )));
        }

        let mut select = car_listing::Entity::find()
            .filter(car_listing::Column::Status.eq(status))
            .order_by_desc(car_listing::Column::CreatedAt);

        if let Some(q) = search_term(q) {
            select = select.filter(
                Condition::any()
                    .add(car_listing::Column::CarId.in_subquery(lookup::cars_matching(q)))
                    .add(car_listing::Column::Location.contains(q))
                    .add(car_listing::Column::Description.contains(q)),
            );
        }

        let page = paginate(db, select, pagination).await?;
        Self::rows(db, page).await
    }

    pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<car_listing::Model, AppError> {
        car_listing::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Listing {id} not found.")))
    }

    pub async fn detail(db: &DatabaseConnection, id: Uuid) -> Result<ListingRow, AppError> {
        let listing = Self::find(db, id).await?;
        let page = Page {
            items: vec![listing],
            total: 1,
            offset: 0,
            limit: 1,
        };
        Self::rows(db, page)
            .await?
            .items
            .pop()
            .ok_or_else(|| AppError::NotFound(format!("Listing {id} not found.")))
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: NewListing,
    ) -> Result<car_listing::Model, AppError> {
        let model = car_listing::ActiveModel {
            car_id: Set(input.car_id),
            seller_id: Set(input.seller_id),
            price: Set(input.price),
            description: Set(input.description),
            location: Set(input.location),
            status: Set(input.status),
            ..Default::default()
        };
        Ok(model.insert(db).await?)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: ListingChanges,
    ) -> Result<car_listing::Model, AppError> {
        let mut active = Self::find(db, id).await?.into_active_model();

        if let Some(car_id) = changes.car_id {
            active.car_id = Set(car_id);
        }
        if let Some(seller_id) = changes.seller_id {
            active.seller_id = Set(seller_id);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(location) = changes.location {
            active.location = Set(location);
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }

        Ok(active.update(db).await?)
    }

    /// Delete a listing together with its favorites, messages and reports.
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
        let result = car_listing::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Listing {id} not found.")));
        }
        Ok(())
    }

    /// `views = views + 1` in a single statement; no other column is written.
    pub async fn increment_views(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
        let result = car_listing::Entity::update_many()
            .col_expr(
                car_listing::Column::Views,
                Expr::col(car_listing::Column::Views).add(1),
            )
            .filter(car_listing::Column::Id.eq(id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Listing {id} not found.")));
        }
        Ok(())
    }

    /// Set `status` on every listing in `ids`. Write hooks are bypassed.
    pub async fn mark_as(
        db: &DatabaseConnection,
        ids: &[Uuid],
        status: ListingStatus,
    ) -> Result<BulkOutcome, AppError> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let result = car_listing::Entity::update_many()
            .col_expr(car_listing::Column::Status, Expr::value(status))
            .col_expr(car_listing::Column::UpdatedAt, Expr::value(now))
            .filter(car_listing::Column::Id.is_in(ids.iter().copied()))
            .exec(db)
            .await?;

        tracing::info!(
            updated = result.rows_affected,
            requested = ids.len(),
            status = status.as_str(),
            "Listings bulk status change"
        );
        Ok(BulkOutcome::new(result.rows_affected, "listing", status.as_str()))
    }
}
