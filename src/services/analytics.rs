use std::net::IpAddr;

use chrono::NaiveDate;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, SqlErr,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Page, Pagination, lookup, paginate, search_term};
use crate::entities::document::{Document, Tally};
use crate::entities::{analytics, search_log};
use crate::error::AppError;

/// Number of search terms shown in the analytics summary column.
const TOP_TERMS: usize = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Inputs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnalytics {
    pub date: NaiveDate,
    #[serde(default)]
    pub new_users: i32,
    #[serde(default)]
    pub new_listings: i32,
    #[serde(default)]
    pub total_views: i32,
    #[serde(default)]
    pub new_messages: i32,
    #[serde(default)]
    pub new_reports: i32,
    #[serde(default)]
    pub search_terms: Tally,
    #[serde(default)]
    pub top_models: Tally,
    #[serde(default)]
    pub popular_locations: Tally,
    #[serde(default)]
    pub revenue_data: Document,
}

/// Editable metrics. The date is fixed once the row exists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalyticsChanges {
    pub new_users: Option<i32>,
    pub new_listings: Option<i32>,
    pub total_views: Option<i32>,
    pub new_messages: Option<i32>,
    pub new_reports: Option<i32>,
    pub search_terms: Option<Tally>,
    pub top_models: Option<Tally>,
    pub popular_locations: Option<Tally>,
    pub revenue_data: Option<Document>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewSearchLog {
    pub query: String,
    pub results_count: i32,
    pub user_id: Option<Uuid>,
    pub ip_address: Option<IpAddr>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLogFilter {
    pub q: Option<String>,
    pub user_id: Option<Uuid>,
    pub results_count: Option<i32>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Outputs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRow {
    #[serde(flatten)]
    pub analytics: analytics::Model,
    pub top_search_terms: String,
}

impl From<analytics::Model> for AnalyticsRow {
    fn from(analytics: analytics::Model) -> Self {
        Self {
            top_search_terms: analytics.search_terms.summary(TOP_TERMS),
            analytics,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchLogRow {
    #[serde(flatten)]
    pub log: search_log::Model,
    pub user_info: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Analytics
// ─────────────────────────────────────────────────────────────────────────────

pub struct AnalyticsService;

impl AnalyticsService {
    /// List daily rows, newest date first, optionally bounded by `from` / `to` (inclusive).
    pub async fn list(
        db: &DatabaseConnection,
        filter: &AnalyticsFilter,
        pagination: Pagination,
    ) -> Result<Page<AnalyticsRow>, AppError> {
        let mut select = analytics::Entity::find().order_by_desc(analytics::Column::Date);
        if let Some(from) = filter.from {
            select = select.filter(analytics::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            select = select.filter(analytics::Column::Date.lte(to));
        }
        Ok(paginate(db, select, pagination).await?.map(AnalyticsRow::from))
    }

    pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<analytics::Model, AppError> {
        analytics::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Analytics row {id} not found.")))
    }

    async fn find_by_date(
        db: &DatabaseConnection,
        date: NaiveDate,
    ) -> Result<Option<analytics::Model>, DbErr> {
        analytics::Entity::find()
            .filter(analytics::Column::Date.eq(date))
            .one(db)
            .await
    }

    /// Return the row for `date` (today in UTC when `None`), creating a zeroed one if needed.
    ///
    /// The boolean is `true` when a row was inserted. Losing an insert race to the unique
    /// date constraint re-reads the winner's row.
    pub async fn get_or_create_for_date(
        db: &DatabaseConnection,
        date: Option<NaiveDate>,
    ) -> Result<(analytics::Model, bool), AppError> {
        let date = date.unwrap_or_else(|| chrono::Utc::now().date_naive());

        if let Some(existing) = Self::find_by_date(db, date).await? {
            return Ok((existing, false));
        }

        let model = analytics::ActiveModel {
            date: Set(date),
            ..Default::default()
        };

        match model.insert(db).await {
            Ok(created) => Ok((created, true)),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                let existing = Self::find_by_date(db, date)
                    .await?
                    .ok_or_else(|| AppError::from(err))?;
                Ok((existing, false))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn create(
        db: &DatabaseConnection,
        input: NewAnalytics,
    ) -> Result<analytics::Model, AppError> {
        let model = analytics::ActiveModel {
            date: Set(input.date),
            new_users: Set(input.new_users),
            new_listings: Set(input.new_listings),
            total_views: Set(input.total_views),
            new_messages: Set(input.new_messages),
            new_reports: Set(input.new_reports),
            search_terms: Set(input.search_terms),
            top_models: Set(input.top_models),
            popular_locations: Set(input.popular_locations),
            revenue_data: Set(input.revenue_data),
            ..Default::default()
        };
        Ok(model.insert(db).await?)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: AnalyticsChanges,
    ) -> Result<analytics::Model, AppError> {
        let mut active = Self::find(db, id).await?.into_active_model();

        if let Some(v) = changes.new_users {
            active.new_users = Set(v);
        }
        if let Some(v) = changes.new_listings {
            active.new_listings = Set(v);
        }
        if let Some(v) = changes.total_views {
            active.total_views = Set(v);
        }
        if let Some(v) = changes.new_messages {
            active.new_messages = Set(v);
        }
        if let Some(v) = changes.new_reports {
            active.new_reports = Set(v);
        }
        if let Some(v) = changes.search_terms {
            active.search_terms = Set(v);
        }
        if let Some(v) = changes.top_models {
            active.top_models = Set(v);
        }
        if let Some(v) = changes.popular_locations {
            active.popular_locations = Set(v);
        }
        if let Some(v) = changes.revenue_data {
            active.revenue_data = Set(v);
        }

        Ok(active.update(db).await?)
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
        let result = analytics::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Analytics row {id} not found.")));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Search logs
// ─────────────────────────────────────────────────────────────────────────────

pub struct SearchLogService;

impl SearchLogService {
    /// Append a search record.
    pub async fn record(
        db: &DatabaseConnection,
        input: NewSearchLog,
    ) -> Result<search_log::Model, AppError> {
        let model = search_log::ActiveModel {
            query: Set(input.query),
            results_count: Set(input.results_count),
            user_id: Set(input.user_id),
            ip_address: Set(input.ip_address.map(|ip| ip.to_string())),
            ..Default::default()
        };
        Ok(model.insert(db).await?)
    }

    /// List search logs, newest first. `q` matches the query, the user, or the IP address.
    pub async fn list(
        db: &DatabaseConnection,
        filter: &SearchLogFilter,
        pagination: Pagination,
    ) -> Result<Page<SearchLogRow>, AppError> {
        let mut select = search_log::Entity::find().order_by_desc(search_log::Column::Timestamp);

        if let Some(q) = search_term(filter.q.as_deref()) {
            select = select.filter(
                Condition::any()
                    .add(search_log::Column::Query.contains(q))
                    .add(search_log::Column::UserId.in_subquery(lookup::users_matching(q)))
                    .add(search_log::Column::IpAddress.contains(q)),
            );
        }
        if let Some(user_id) = filter.user_id {
            select = select.filter(search_log::Column::UserId.eq(user_id));
        }
        if let Some(results_count) = filter.results_count {
            select = select.filter(search_log::Column::ResultsCount.eq(results_count));
        }

        let page = paginate(db, select, pagination).await?;
        let users = lookup::users(db, page.items.iter().filter_map(|l| l.user_id)).await?;

        Ok(page.map(|log| SearchLogRow {
            user_info: log
                .user_id
                .and_then(|id| users.get(&id))
                .map_or_else(|| "Anonymous".to_string(), |u| u.username.clone()),
            log,
        }))
    }

    pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<search_log::Model, AppError> {
        search_log::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Search log {id} not found.")))
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
        let result = search_log::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Search log {id} not found.")));
        }
        Ok(())
    }
}
