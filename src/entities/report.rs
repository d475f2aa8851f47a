use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue;
use serde::{Deserialize, Serialize};

use super::current;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "lowercase")]
pub enum ReportReason {
    #[sea_orm(string_value = "scam")]
    Scam,
    #[sea_orm(string_value = "spam")]
    Spam,
    #[sea_orm(string_value = "offensive")]
    Offensive,
    #[sea_orm(string_value = "fake")]
    Fake,
    #[sea_orm(string_value = "inappropriate")]
    Inappropriate,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Moderation state. Any state may follow any other; bulk actions only pick eligible rows.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "reviewed")]
    Reviewed,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "dismissed")]
    Dismissed,
}

impl ReportStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Resolved => "resolved",
            Self::Dismissed => "dismissed",
        }
    }
}

/// What a report is about: exactly one listing or exactly one user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum ReportTarget {
    Listing(Uuid),
    User(Uuid),
}

impl ReportTarget {
    /// Rebuild a target from the two nullable storage columns.
    ///
    /// # Errors
    ///
    /// Returns a message when neither or both columns are populated.
    pub fn from_columns(listing: Option<Uuid>, user: Option<Uuid>) -> Result<Self, String> {
        match (listing, user) {
            (Some(id), None) => Ok(Self::Listing(id)),
            (None, Some(id)) => Ok(Self::User(id)),
            (None, None) => Err("A report must target either a listing or a user.".to_string()),
            (Some(_), Some(_)) => {
                Err("A report cannot target both a listing and a user.".to_string())
            }
        }
    }

    /// Split into `(reported_listing_id, reported_user_id)`.
    #[must_use]
    pub const fn into_columns(self) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            Self::Listing(id) => (Some(id), None),
            Self::User(id) => (None, Some(id)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub reported_listing_id: Option<Uuid>,
    pub reported_user_id: Option<Uuid>,
    pub reason: ReportReason,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub status: ReportStatus,
    pub reviewed_by_id: Option<Uuid>,
    pub reviewed_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text")]
    pub admin_notes: String,
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// The report's target, or `None` if the stored row is malformed.
    #[must_use]
    pub fn target(&self) -> Option<ReportTarget> {
        ReportTarget::from_columns(self.reported_listing_id, self.reported_user_id).ok()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Reporter,
    #[sea_orm(
        belongs_to = "super::car_listing::Entity",
        from = "Column::ReportedListingId",
        to = "super::car_listing::Column::Id",
        on_delete = "Cascade"
    )]
    ReportedListing,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReportedUserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    ReportedUser,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReviewedById",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    ReviewedBy,
}

impl Related<super::car_listing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportedListing.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        // On insert an unset column is NULL; on update it is left alone.
        let targets_known =
            insert || !(self.reported_listing_id.is_not_set() || self.reported_user_id.is_not_set());
        if targets_known {
            let listing = current(&self.reported_listing_id).copied().flatten();
            let user = current(&self.reported_user_id).copied().flatten();
            ReportTarget::from_columns(listing, user).map_err(DbErr::Custom)?;
        }

        if let (Some(reporter), Some(Some(reported))) =
            (current(&self.reporter_id), current(&self.reported_user_id))
        {
            if reporter == reported {
                return Err(DbErr::Custom("Users cannot report themselves.".to_string()));
            }
        }

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        if matches!(current(&self.reviewed_by_id), Some(Some(_)))
            && matches!(current(&self.reviewed_at), None | Some(None))
        {
            self.reviewed_at = ActiveValue::Set(Some(now));
        }

        if insert {
            if self.id.is_not_set() {
                self.id = ActiveValue::Set(Uuid::new_v4());
            }
            if self.status.is_not_set() {
                self.status = ActiveValue::Set(ReportStatus::Pending);
            }
            if self.description.is_not_set() {
                self.description = ActiveValue::Set(String::new());
            }
            if self.admin_notes.is_not_set() {
                self.admin_notes = ActiveValue::Set(String::new());
            }
            if self.created_at.is_not_set() {
                self.created_at = ActiveValue::Set(now);
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_columns() {
        let id = Uuid::new_v4();
        assert_eq!(ReportTarget::from_columns(Some(id), None), Ok(ReportTarget::Listing(id)));
        assert_eq!(ReportTarget::from_columns(None, Some(id)), Ok(ReportTarget::User(id)));
        assert!(ReportTarget::from_columns(None, None).is_err());
        assert!(ReportTarget::from_columns(Some(id), Some(id)).is_err());
    }

    #[test]
    fn test_target_round_trips_columns() {
        let id = Uuid::new_v4();
        let (listing, user) = ReportTarget::User(id).into_columns();
        assert_eq!(ReportTarget::from_columns(listing, user), Ok(ReportTarget::User(id)));
    }

    #[test]
    fn test_target_json_shape() {
        let id = Uuid::nil();
        let value = serde_json::to_value(ReportTarget::Listing(id)).unwrap_or_default();
        assert_eq!(value["type"], "listing");
        assert_eq!(value["id"], id.to_string());
    }
}
