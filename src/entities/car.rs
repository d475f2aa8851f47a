use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use super::current;
use crate::validation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    #[sea_orm(string_value = "petrol")]
    Petrol,
    #[sea_orm(string_value = "diesel")]
    Diesel,
    #[sea_orm(string_value = "hybrid")]
    Hybrid,
    #[sea_orm(string_value = "electric")]
    Electric,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum Transmission {
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "automatic")]
    Automatic,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "car")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i32,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub color: String,
    /// Free-form displacement, e.g. `"2.5L"` or `"Electric"`.
    pub engine_size: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::car_listing::Entity")]
    CarListings,
}

impl Related<super::car_listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CarListings.def()
    }
}

impl Model {
    /// `"{year} {make} {model}"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let Some(year) = current(&self.year) {
            validation::car_year(*year).map_err(DbErr::Custom)?;
        }
        if let Some(mileage) = current(&self.mileage) {
            validation::non_negative("Mileage", *mileage).map_err(DbErr::Custom)?;
        }

        if insert && self.id.is_not_set() {
            self.id = ActiveValue::Set(Uuid::new_v4());
        }
        Ok(self)
    }
}
