use sea_orm::ActiveValue::Set;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BulkOutcome, Page, Pagination, lookup, paginate, search_term};
use crate::entities::report::{self, ReportReason, ReportStatus, ReportTarget};
use crate::entities::user;
use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReport {
    pub reporter_id: Uuid,
    pub target: ReportTarget,
    pub reason: ReportReason,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportChanges {
    pub target: Option<ReportTarget>,
    pub reason: Option<ReportReason>,
    pub description: Option<String>,
    pub status: Option<ReportStatus>,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    pub q: Option<String>,
    pub reason: Option<ReportReason>,
    pub status: Option<ReportStatus>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    #[serde(flatten)]
    pub report: report::Model,
    pub reporter: String,
    pub target_info: String,
    pub reviewed_by: Option<String>,
}

/// Named moderation bulk actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportAction {
    /// Pending reports only.
    MarkReviewed,
    /// Every report not already resolved.
    MarkResolved,
    /// Every report not already dismissed.
    MarkDismissed,
}

impl ReportAction {
    #[must_use]
    pub const fn status(self) -> ReportStatus {
        match self {
            Self::MarkReviewed => ReportStatus::Reviewed,
            Self::MarkResolved => ReportStatus::Resolved,
            Self::MarkDismissed => ReportStatus::Dismissed,
        }
    }

    fn eligible(self) -> sea_orm::sea_query::SimpleExpr {
        match self {
            Self::MarkReviewed => report::Column::Status.eq(ReportStatus::Pending),
            Self::MarkResolved => report::Column::Status.ne(ReportStatus::Resolved),
            Self::MarkDismissed => report::Column::Status.ne(ReportStatus::Dismissed),
        }
    }
}

pub struct ReportService;

impl ReportService {
    /// List reports, newest first.
    ///
    /// `q` matches reporter or reported user (username/email), the reported car's make or
    /// model, the description and the admin notes.
    pub async fn list(
        db: &DatabaseConnection,
        filter: &ReportFilter,
        pagination: Pagination,
    ) -> Result<Page<ReportRow>, AppError> {
        let mut select = report::Entity::find().order_by_desc(report::Column::CreatedAt);

        if let Some(q) = search_term(filter.q.as_deref()) {
            select = select.filter(
                Condition::any()
                    .add(report::Column::ReporterId.in_subquery(lookup::users_matching(q)))
                    .add(report::Column::ReportedUserId.in_subquery(lookup::users_matching(q)))
                    .add(
                        report::Column::ReportedListingId
                            .in_subquery(lookup::listings_matching(q)),
                    )
                    .add(report::Column::Description.contains(q))
                    .add(report::Column::AdminNotes.contains(q)),
            );
        }
        if let Some(reason) = filter.reason {
            select = select.filter(report::Column::Reason.eq(reason));
        }
        if let Some(status) = filter.status {
            select = select.filter(report::Column::Status.eq(status));
        }

        let page = paginate(db, select, pagination).await?;
        let users = lookup::users(
            db,
            page.items.iter().flat_map(|r| {
                [Some(r.reporter_id), r.reported_user_id, r.reviewed_by_id]
                    .into_iter()
                    .flatten()
            }),
        )
        .await?;
        let listings =
            lookup::listings(db, page.items.iter().filter_map(|r| r.reported_listing_id)).await?;

        Ok(page.map(|report| {
            let target_info = match report.target() {
                Some(ReportTarget::Listing(id)) => listings.get(&id).map_or_else(
                    || "Unknown".to_string(),
                    |l| format!("Listing: {}", l.label()),
                ),
                Some(ReportTarget::User(id)) => users.get(&id).map_or_else(
                    || "Unknown".to_string(),
                    |u| format!("User: {}", u.username),
                ),
                None => "Unknown".to_string(),
            };
            ReportRow {
                reporter: users
                    .get(&report.reporter_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
                reviewed_by: report
                    .reviewed_by_id
                    .and_then(|id| users.get(&id))
                    .map(|u| u.username.clone()),
                target_info,
                report,
            }
        }))
    }

    pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<report::Model, AppError> {
        report::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {id} not found.")))
    }

    /// File a report against exactly one listing or user.
    pub async fn create(db: &DatabaseConnection, input: NewReport) -> Result<report::Model, AppError> {
        let (reported_listing_id, reported_user_id) = input.target.into_columns();
        let model = report::ActiveModel {
            reporter_id: Set(input.reporter_id),
            reported_listing_id: Set(reported_listing_id),
            reported_user_id: Set(reported_user_id),
            reason: Set(input.reason),
            description: Set(input.description),
            ..Default::default()
        };

        let created = model.insert(db).await?;
        tracing::info!(
            report_id = %created.id,
            reporter_id = %created.reporter_id,
            "Report filed"
        );
        Ok(created)
    }

    /// Edit a report as `reviewer`.
    ///
    /// Changing the status to anything but `pending` on a report that has no reviewer
    /// stamps `reviewer` and the current time. Resending the current status is not a change.
    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: ReportChanges,
        reviewer: &user::Model,
    ) -> Result<report::Model, AppError> {
        let existing = Self::find(db, id).await?;
        let needs_stamp = existing.reviewed_by_id.is_none();
        let previous_status = existing.status;
        let mut active = existing.into_active_model();

        if let Some(target) = changes.target {
            let (listing, user) = target.into_columns();
            active.reported_listing_id = Set(listing);
            active.reported_user_id = Set(user);
        }
        if let Some(reason) = changes.reason {
            active.reason = Set(reason);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(admin_notes) = changes.admin_notes {
            active.admin_notes = Set(admin_notes);
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
            if status != previous_status && status != ReportStatus::Pending && needs_stamp {
                let now: DateTimeWithTimeZone = chrono::Utc::now().into();
                active.reviewed_by_id = Set(Some(reviewer.id));
                active.reviewed_at = Set(Some(now));
            }
        }

        Ok(active.update(db).await?)
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
        let result = report::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Report {id} not found.")));
        }
        Ok(())
    }

    /// Apply a bulk action to the eligible reports in `ids`, stamping `reviewer` and now.
    pub async fn apply(
        db: &DatabaseConnection,
        ids: &[Uuid],
        action: ReportAction,
        reviewer: &user::Model,
    ) -> Result<BulkOutcome, AppError> {
        let status = action.status();
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        let result = report::Entity::update_many()
            .col_expr(report::Column::Status, Expr::value(status))
            .col_expr(report::Column::ReviewedById, Expr::value(reviewer.id))
            .col_expr(report::Column::ReviewedAt, Expr::value(now))
            .filter(report::Column::Id.is_in(ids.iter().copied()))
            .filter(action.eligible())
            .exec(db)
            .await?;

        tracing::info!(
            updated = result.rows_affected,
            requested = ids.len(),
            status = status.as_str(),
            reviewer_id = %reviewer.id,
            "Reports bulk status change"
        );
        Ok(BulkOutcome::new(result.rows_affected, "report", status.as_str()))
    }
}
