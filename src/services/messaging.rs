use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BulkOutcome, Page, Pagination, lookup, nullable, paginate, search_term};
use crate::entities::car_listing::ListingStatus;
use crate::entities::message;
use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    #[serde(default)]
    pub listing_id: Option<Uuid>,
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageChanges {
    pub sender_id: Option<Uuid>,
    pub receiver_id: Option<Uuid>,
    #[serde(default, deserialize_with = "nullable")]
    pub listing_id: Option<Option<Uuid>>,
    pub content: Option<String>,
    pub is_read: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFilter {
    pub q: Option<String>,
    pub is_read: Option<bool>,
    pub sender_id: Option<Uuid>,
    pub receiver_id: Option<Uuid>,
    pub listing_status: Option<ListingStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRow {
    #[serde(flatten)]
    pub message: message::Model,
    pub sender: String,
    pub receiver: String,
    pub listing_info: String,
    pub content_preview: String,
}

pub struct MessageService;

impl MessageService {
    /// List messages, newest first.
    ///
    /// `q` matches either party's username or email, the content, or the listed car.
    pub async fn list(
        db: &DatabaseConnection,
        filter: &MessageFilter,
        pagination: Pagination,
    ) -> Result<Page<MessageRow>, AppError> {
        let mut select = message::Entity::find().order_by_desc(message::Column::Timestamp);

        if let Some(q) = search_term(filter.q.as_deref()) {
            select = select.filter(
                Condition::any()
                    .add(message::Column::SenderId.in_subquery(lookup::users_matching(q)))
                    .add(message::Column::ReceiverId.in_subquery(lookup::users_matching(q)))
                    .add(message::Column::Content.contains(q))
                    .add(message::Column::ListingId.in_subquery(lookup::listings_matching(q))),
            );
        }
        if let Some(is_read) = filter.is_read {
            select = select.filter(message::Column::IsRead.eq(is_read));
        }
        if let Some(sender_id) = filter.sender_id {
            select = select.filter(message::Column::SenderId.eq(sender_id));
        }
        if let Some(receiver_id) = filter.receiver_id {
            select = select.filter(message::Column::ReceiverId.eq(receiver_id));
        }
        if let Some(status) = filter.listing_status {
            select = select
                .filter(message::Column::ListingId.in_subquery(lookup::listings_with_status(status)));
        }

        let page = paginate(db, select, pagination).await?;
        let users = lookup::users(
            db,
            page.items
                .iter()
                .flat_map(|m| [m.sender_id, m.receiver_id]),
        )
        .await?;
        let listings = lookup::listings(db, page.items.iter().filter_map(|m| m.listing_id)).await?;

        let username = |id: &Uuid| {
            users
                .get(id)
                .map(|u| u.username.clone())
                .unwrap_or_default()
        };

        Ok(page.map(|message| MessageRow {
            sender: username(&message.sender_id),
            receiver: username(&message.receiver_id),
            listing_info: message
                .listing_id
                .and_then(|id| listings.get(&id))
                .map_or_else(|| "No listing".to_string(), lookup::ListingWithCar::label),
            content_preview: message.content_preview(),
            message,
        }))
    }

    pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<message::Model, AppError> {
        message::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Message {id} not found.")))
    }

    /// Send a message. Sending to oneself is rejected by the write hook.
    pub async fn send(db: &DatabaseConnection, input: NewMessage) -> Result<message::Model, AppError> {
        let model = message::ActiveModel {
            sender_id: Set(input.sender_id),
            receiver_id: Set(input.receiver_id),
            listing_id: Set(input.listing_id),
            content: Set(input.content),
            ..Default::default()
        };
        Ok(model.insert(db).await?)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: MessageChanges,
    ) -> Result<message::Model, AppError> {
        let mut active = Self::find(db, id).await?.into_active_model();

        if let Some(sender_id) = changes.sender_id {
            active.sender_id = Set(sender_id);
        }
        if let Some(receiver_id) = changes.receiver_id {
            active.receiver_id = Set(receiver_id);
        }
        if let Some(listing_id) = changes.listing_id {
            active.listing_id = Set(listing_id);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(is_read) = changes.is_read {
            active.is_read = Set(is_read);
        }

        Ok(active.update(db).await?)
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
        let result = message::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Message {id} not found.")));
        }
        Ok(())
    }

    /// Mark one message read.
    ///
    /// Returns `true` if this call flipped the flag and `false` if it was already read,
    /// in which case nothing is written.
    pub async fn mark_as_read(db: &DatabaseConnection, id: Uuid) -> Result<bool, AppError> {
        let result = message::Entity::update_many()
            .col_expr(message::Column::IsRead, Expr::value(true))
            .filter(message::Column::Id.eq(id))
            .filter(message::Column::IsRead.eq(false))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            Self::find(db, id).await?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Set `is_read` on every message in `ids`.
    pub async fn mark_read_state(
        db: &DatabaseConnection,
        ids: &[Uuid],
        is_read: bool,
    ) -> Result<BulkOutcome, AppError> {
        let result = message::Entity::update_many()
            .col_expr(message::Column::IsRead, Expr::value(is_read))
            .filter(message::Column::Id.is_in(ids.iter().copied()))
            .exec(db)
            .await?;

        let state = if is_read { "read" } else { "unread" };
        tracing::info!(
            updated = result.rows_affected,
            requested = ids.len(),
            state,
            "Messages bulk read-state change"
        );
        Ok(BulkOutcome::new(result.rows_affected, "message", state))
    }
}
