use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use super::current;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "message")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub listing_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub timestamp: DateTimeWithTimeZone,
    pub is_read: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SenderId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Sender,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReceiverId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Receiver,
    #[sea_orm(
        belongs_to = "super::car_listing::Entity",
        from = "Column::ListingId",
        to = "super::car_listing::Column::Id",
        on_delete = "Cascade"
    )]
    Listing,
}

impl Related<super::car_listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listing.def()
    }
}

impl Model {
    /// First 50 characters of the body, with `"..."` appended when truncated.
    #[must_use]
    pub fn content_preview(&self) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(50).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let (Some(sender), Some(receiver)) = (current(&self.sender_id), current(&self.receiver_id)) {
            if sender == receiver {
                return Err(DbErr::Custom(
                    "Sender and receiver cannot be the same user.".to_string(),
                ));
            }
        }

        if insert {
            if self.id.is_not_set() {
                self.id = ActiveValue::Set(Uuid::new_v4());
            }
            if self.is_read.is_not_set() {
                self.is_read = ActiveValue::Set(false);
            }
            if self.timestamp.is_not_set() {
                self.timestamp = ActiveValue::Set(chrono::Utc::now().into());
            }
        }
        Ok(self)
    }
}
