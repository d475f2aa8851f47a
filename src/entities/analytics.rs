use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use super::current;
use super::document::{Document, Tally};
use crate::validation;

/// Daily platform metrics, one row per calendar date.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "analytics")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub date: Date,
    pub new_users: i32,
    pub new_listings: i32,
    pub total_views: i32,
    pub new_messages: i32,
    pub new_reports: i32,
    #[sea_orm(column_type = "Json")]
    pub search_terms: Tally,
    #[sea_orm(column_type = "Json")]
    pub top_models: Tally,
    #[sea_orm(column_type = "Json")]
    pub popular_locations: Tally,
    #[sea_orm(column_type = "Json")]
    pub revenue_data: Document,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert && matches!(self.date, ActiveValue::Set(_)) {
            return Err(DbErr::Custom(
                "The date of an analytics row cannot be changed.".to_string(),
            ));
        }

        for (field, value) in [
            ("New users", &self.new_users),
            ("New listings", &self.new_listings),
            ("Total views", &self.total_views),
            ("New messages", &self.new_messages),
            ("New reports", &self.new_reports),
        ] {
            if let Some(count) = current(value) {
                validation::non_negative(field, *count).map_err(DbErr::Custom)?;
            }
        }

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        if insert {
            if self.id.is_not_set() {
                self.id = ActiveValue::Set(Uuid::new_v4());
            }
            for counter in [
                &mut self.new_users,
                &mut self.new_listings,
                &mut self.total_views,
                &mut self.new_messages,
                &mut self.new_reports,
            ] {
                if counter.is_not_set() {
                    *counter = ActiveValue::Set(0);
                }
            }
            for tally in [
                &mut self.search_terms,
                &mut self.top_models,
                &mut self.popular_locations,
            ] {
                if tally.is_not_set() {
                    *tally = ActiveValue::Set(Tally::default());
                }
            }
            if self.revenue_data.is_not_set() {
                self.revenue_data = ActiveValue::Set(Document::default());
            }
            if self.created_at.is_not_set() {
                self.created_at = ActiveValue::Set(now);
            }
        }
        self.updated_at = ActiveValue::Set(now);
        Ok(self)
    }
}
