use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::auth::middleware::AdminUser;
use crate::entities::search_log;
use crate::error::AppError;
use crate::services::analytics::{SearchLogFilter, SearchLogRow, SearchLogService};
use crate::services::{Page, Pagination};
use crate::state::AppState;

/// Read and delete only; logs are written by the public search endpoint.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_search_logs))
        .route("/{id}", get(get_search_log).delete(delete_search_log))
}

async fn list_search_logs(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filter): Query<SearchLogFilter>,
) -> Result<Json<Page<SearchLogRow>>, AppError> {
    Ok(Json(
        SearchLogService::list(&state.db, &filter, pagination).await?,
    ))
}

async fn get_search_log(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<search_log::Model>, AppError> {
    Ok(Json(SearchLogService::find(&state.db, id).await?))
}

async fn delete_search_log(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    SearchLogService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
