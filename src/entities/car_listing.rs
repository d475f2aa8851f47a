use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use super::current;
use crate::validation;

/// Lifecycle state of a listing. Any state may follow any other.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "sold")]
    Sold,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl ListingStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Sold => "sold",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }

    /// Whether anonymous visitors may see listings in this state.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Available | Self::Sold)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "car_listing")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub car_id: Uuid,
    pub seller_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub location: String,
    pub status: ListingStatus,
    /// Only ever moved forward by `ListingService::increment_views`.
    pub views: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::car::Entity",
        from = "Column::CarId",
        to = "super::car::Column::Id",
        on_delete = "Cascade"
    )]
    Car,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SellerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Seller,
    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorites,
    #[sea_orm(has_many = "super::message::Entity")]
    Messages,
    #[sea_orm(has_many = "super::report::Entity")]
    Reports,
}

impl Related<super::car::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Car.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl Related<super::favorite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl Related<super::message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let Some(price) = current(&self.price) {
            validation::non_negative("Price", *price).map_err(DbErr::Custom)?;
        }
        if let Some(views) = current(&self.views) {
            validation::non_negative("Views", *views).map_err(DbErr::Custom)?;
        }

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        if insert {
            if self.id.is_not_set() {
                self.id = ActiveValue::Set(Uuid::new_v4());
            }
            if self.status.is_not_set() {
                self.status = ActiveValue::Set(ListingStatus::Available);
            }
            if self.views.is_not_set() {
                self.views = ActiveValue::Set(0);
            }
            if self.created_at.is_not_set() {
                self.created_at = ActiveValue::Set(now);
            }
        }
        self.updated_at = ActiveValue::Set(now);
        Ok(self)
    }
}
