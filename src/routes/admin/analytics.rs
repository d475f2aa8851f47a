use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AdminUser;
use crate::entities::analytics;
use crate::error::AppError;
use crate::services::analytics::{
    AnalyticsChanges, AnalyticsFilter, AnalyticsRow, AnalyticsService, NewAnalytics,
};
use crate::services::{Page, Pagination};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_analytics).post(create_analytics))
        .route("/for-date", post(for_date))
        .route(
            "/{id}",
            get(get_analytics)
                .patch(update_analytics)
                .delete(delete_analytics),
        )
}

#[derive(Debug, Default, Deserialize)]
struct ForDateRequest {
    date: Option<NaiveDate>,
}

async fn list_analytics(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filter): Query<AnalyticsFilter>,
) -> Result<Json<Page<AnalyticsRow>>, AppError> {
    Ok(Json(
        AnalyticsService::list(&state.db, &filter, pagination).await?,
    ))
}

async fn get_analytics(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalyticsRow>, AppError> {
    Ok(Json(AnalyticsService::find(&state.db, id).await?.into()))
}

async fn create_analytics(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<NewAnalytics>,
) -> Result<(StatusCode, Json<analytics::Model>), AppError> {
    let created = AnalyticsService::create(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `POST /analytics/for-date` with optional `{ "date": "YYYY-MM-DD" }`, defaulting to today.
async fn for_date(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<ForDateRequest>,
) -> Result<(StatusCode, Json<analytics::Model>), AppError> {
    let (row, created) = AnalyticsService::get_or_create_for_date(&state.db, body.date).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(row)))
}

async fn update_analytics(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AnalyticsChanges>,
) -> Result<Json<analytics::Model>, AppError> {
    Ok(Json(AnalyticsService::update(&state.db, id, body).await?))
}

async fn delete_analytics(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    AnalyticsService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
