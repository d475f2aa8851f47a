use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::auth::middleware::AdminUser;
use crate::entities::car_listing::{self, ListingStatus};
use crate::error::AppError;
use crate::services::catalog::{
    ListingChanges, ListingFilter, ListingRow, ListingService, NewListing,
};
use crate::services::{BulkOutcome, BulkRequest, Page, Pagination};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_listings).post(create_listing))
        .route(
            "/{id}",
            get(get_listing).patch(update_listing).delete(delete_listing),
        )
        .route("/actions/mark_as_sold", post(mark_as_sold))
        .route("/actions/mark_as_available", post(mark_as_available))
}

async fn list_listings(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filter): Query<ListingFilter>,
) -> Result<Json<Page<ListingRow>>, AppError> {
    Ok(Json(ListingService::list(&state.db, &filter, pagination).await?))
}

/// Admin reads do not count as views.
async fn get_listing(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListingRow>, AppError> {
    Ok(Json(ListingService::detail(&state.db, id).await?))
}

async fn create_listing(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<NewListing>,
) -> Result<(StatusCode, Json<car_listing::Model>), AppError> {
    let created = ListingService::create(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_listing(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ListingChanges>,
) -> Result<Json<car_listing::Model>, AppError> {
    Ok(Json(ListingService::update(&state.db, id, body).await?))
}

async fn delete_listing(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ListingService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_as_sold(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<BulkRequest>,
) -> Result<Json<BulkOutcome>, AppError> {
    Ok(Json(
        ListingService::mark_as(&state.db, &body.ids, ListingStatus::Sold).await?,
    ))
}

async fn mark_as_available(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<BulkRequest>,
) -> Result<Json<BulkOutcome>, AppError> {
    Ok(Json(
        ListingService::mark_as(&state.db, &body.ids, ListingStatus::Available).await?,
    ))
}
