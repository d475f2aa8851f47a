use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, SqlErr,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Page, Pagination, lookup, paginate, search_term};
use crate::entities::car_listing::ListingStatus;
use crate::entities::{favorite, user};
use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    pub user_id: Uuid,
    pub listing_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteFilter {
    pub q: Option<String>,
    pub user_id: Option<Uuid>,
    pub listing_status: Option<ListingStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRow {
    #[serde(flatten)]
    pub favorite: favorite::Model,
    pub user: String,
    pub listing_info: String,
}

pub struct FavoriteService;

impl FavoriteService {
    /// List favorites, newest first. `q` matches the user or the listed car's make/model.
    pub async fn list(
        db: &DatabaseConnection,
        filter: &FavoriteFilter,
        pagination: Pagination,
    ) -> Result<Page<FavoriteRow>, AppError> {
        let mut select = favorite::Entity::find().order_by_desc(favorite::Column::CreatedAt);

        if let Some(q) = search_term(filter.q.as_deref()) {
            select = select.filter(
                Condition::any()
                    .add(favorite::Column::UserId.in_subquery(lookup::users_matching(q)))
                    .add(favorite::Column::ListingId.in_subquery(lookup::listings_matching(q))),
            );
        }
        if let Some(user_id) = filter.user_id {
            select = select.filter(favorite::Column::UserId.eq(user_id));
        }
        if let Some(status) = filter.listing_status {
            select = select
                .filter(favorite::Column::ListingId.in_subquery(lookup::listings_with_status(status)));
        }

        let page = paginate(db, select, pagination).await?;
        let users = lookup::users(db, page.items.iter().map(|f| f.user_id)).await?;
        let listings = lookup::listings(db, page.items.iter().map(|f| f.listing_id)).await?;

        Ok(page.map(|favorite| FavoriteRow {
            user: users
                .get(&favorite.user_id)
                .map(user::Model::label)
                .unwrap_or_default(),
            listing_info: listings
                .get(&favorite.listing_id)
                .map(lookup::ListingWithCar::label)
                .unwrap_or_default(),
            favorite,
        }))
    }

    pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<favorite::Model, AppError> {
        favorite::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Favorite {id} not found.")))
    }

    async fn find_pair(
        db: &DatabaseConnection,
        user_id: Uuid,
        listing_id: Uuid,
    ) -> Result<Option<favorite::Model>, DbErr> {
        favorite::Entity::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .filter(favorite::Column::ListingId.eq(listing_id))
            .one(db)
            .await
    }

    /// Return the existing favorite for `(user, listing)` or create it.
    ///
    /// The boolean is `true` when a row was inserted. A concurrent insert that wins the
    /// unique constraint is resolved by re-reading the pair.
    pub async fn get_or_create(
        db: &DatabaseConnection,
        input: NewFavorite,
    ) -> Result<(favorite::Model, bool), AppError> {
        if let Some(existing) = Self::find_pair(db, input.user_id, input.listing_id).await? {
            return Ok((existing, false));
        }

        let model = favorite::ActiveModel {
            user_id: Set(input.user_id),
            listing_id: Set(input.listing_id),
            ..Default::default()
        };

        match model.insert(db).await {
            Ok(created) => Ok((created, true)),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                let existing = Self::find_pair(db, input.user_id, input.listing_id)
                    .await?
                    .ok_or_else(|| AppError::from(err))?;
                Ok((existing, false))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
        let result = favorite::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Favorite {id} not found.")));
        }
        Ok(())
    }
}
