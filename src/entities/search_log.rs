use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use super::current;
use crate::validation;

/// A recorded search. Rows are append-only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "search_log")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub query: String,
    pub results_count: i32,
    pub user_id: Option<Uuid>,
    pub ip_address: Option<String>,
    pub timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            return Err(DbErr::Custom("Search logs cannot be modified.".to_string()));
        }
        if let Some(count) = current(&self.results_count) {
            validation::non_negative("Results count", *count).map_err(DbErr::Custom)?;
        }
        if let Some(Some(ip)) = current(&self.ip_address) {
            validation::ip_address(ip).map_err(DbErr::Custom)?;
        }

        if self.id.is_not_set() {
            self.id = ActiveValue::Set(Uuid::new_v4());
        }
        if self.results_count.is_not_set() {
            self.results_count = ActiveValue::Set(0);
        }
        if self.timestamp.is_not_set() {
            self.timestamp = ActiveValue::Set(chrono::Utc::now().into());
        }
        Ok(self)
    }
}
