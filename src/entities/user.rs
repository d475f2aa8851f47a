use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use super::current;
use crate::validation;

/// Account role.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    #[sea_orm(string_value = "buyer")]
    Buyer,
    #[sea_orm(string_value = "seller")]
    Seller,
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "superadmin")]
    Superadmin,
}

impl Role {
    /// Whether the role grants access to the administrative surface.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::Superadmin)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::buyer_profile::Entity")]
    BuyerProfile,
    #[sea_orm(has_one = "super::seller_profile::Entity")]
    SellerProfile,
    #[sea_orm(has_many = "super::car_listing::Entity")]
    CarListings,
    #[sea_orm(has_many = "super::favorite::Entity")]
    Favorites,
    #[sea_orm(has_many = "super::search_log::Entity")]
    SearchLogs,
}

impl Related<super::buyer_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BuyerProfile.def()
    }
}

impl Related<super::seller_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SellerProfile.def()
    }
}

impl Related<super::car_listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarListings.def()
    }
}

impl Related<super::favorite::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl Related<super::search_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SearchLogs.def()
    }
}

impl Model {
    /// `"username (email)"`, the label used across admin listings.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.username, self.email)
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let Some(username) = current(&self.username) {
            validation::username(username).map_err(DbErr::Custom)?;
        }
        if let Some(email) = current(&self.email) {
            validation::email(email).map_err(DbErr::Custom)?;
        }
        if let Some(Some(phone)) = current(&self.phone_number) {
            validation::phone(phone).map_err(DbErr::Custom)?;
        }

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        if insert {
            if self.id.is_not_set() {
                self.id = ActiveValue::Set(Uuid::new_v4());
            }
            if self.created_at.is_not_set() {
                self.created_at = ActiveValue::Set(now);
            }
        }
        self.updated_at = ActiveValue::Set(now);
        Ok(self)
    }
}
