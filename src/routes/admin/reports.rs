use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::auth::middleware::AdminUser;
use crate::entities::{report, user};
use crate::error::AppError;
use crate::services::moderation::{
    NewReport, ReportAction, ReportChanges, ReportFilter, ReportRow, ReportService,
};
use crate::services::{BulkOutcome, BulkRequest, Page, Pagination};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reports).post(create_report))
        .route(
            "/{id}",
            get(get_report).patch(update_report).delete(delete_report),
        )
        .route("/actions/mark_as_reviewed", post(mark_as_reviewed))
        .route("/actions/mark_as_resolved", post(mark_as_resolved))
        .route("/actions/mark_as_dismissed", post(mark_as_dismissed))
}

async fn list_reports(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filter): Query<ReportFilter>,
) -> Result<Json<Page<ReportRow>>, AppError> {
    Ok(Json(ReportService::list(&state.db, &filter, pagination).await?))
}

async fn get_report(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<report::Model>, AppError> {
    Ok(Json(ReportService::find(&state.db, id).await?))
}

async fn create_report(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<NewReport>,
) -> Result<(StatusCode, Json<report::Model>), AppError> {
    let created = ReportService::create(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_report(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReportChanges>,
) -> Result<Json<report::Model>, AppError> {
    Ok(Json(ReportService::update(&state.db, id, body, &admin).await?))
}

async fn delete_report(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ReportService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn run_action(
    state: &AppState,
    admin: &user::Model,
    body: &BulkRequest,
    action: ReportAction,
) -> Result<Json<BulkOutcome>, AppError> {
    Ok(Json(
        ReportService::apply(&state.db, &body.ids, action, admin).await?,
    ))
}

async fn mark_as_reviewed(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(body): Json<BulkRequest>,
) -> Result<Json<BulkOutcome>, AppError> {
    run_action(&state, &admin, &body, ReportAction::MarkReviewed).await
}

async fn mark_as_resolved(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(body): Json<BulkRequest>,
) -> Result<Json<BulkOutcome>, AppError> {
    run_action(&state, &admin, &body, ReportAction::MarkResolved).await
}

async fn mark_as_dismissed(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Json(body): Json<BulkRequest>,
) -> Result<Json<BulkOutcome>, AppError> {
    run_action(&state, &admin, &body, ReportAction::MarkDismissed).await
}
