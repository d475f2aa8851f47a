use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::auth::middleware::AdminUser;
use crate::entities::favorite;
use crate::error::AppError;
use crate::services::favorites::{FavoriteFilter, FavoriteRow, FavoriteService, NewFavorite};
use crate::services::{Page, Pagination};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites).post(create_favorite))
        .route("/{id}", get(get_favorite).delete(delete_favorite))
}

async fn list_favorites(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filter): Query<FavoriteFilter>,
) -> Result<Json<Page<FavoriteRow>>, AppError> {
    Ok(Json(FavoriteService::list(&state.db, &filter, pagination).await?))
}

async fn get_favorite(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<favorite::Model>, AppError> {
    Ok(Json(FavoriteService::find(&state.db, id).await?))
}

/// 201 for a new favorite, 200 when the pair already existed.
async fn create_favorite(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<NewFavorite>,
) -> Result<(StatusCode, Json<favorite::Model>), AppError> {
    let (favorite, created) = FavoriteService::get_or_create(&state.db, body).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(favorite)))
}

async fn delete_favorite(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    FavoriteService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
