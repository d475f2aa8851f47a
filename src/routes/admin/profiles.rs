use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::auth::middleware::AdminUser;
use crate::entities::{buyer_profile, seller_profile};
use crate::error::AppError;
use crate::services::accounts::{
    BuyerProfileChanges, NewBuyerProfile, NewSellerProfile, ProfileFilter, ProfileRow,
    ProfileService, SellerProfileChanges,
};
use crate::services::{Page, Pagination};
use crate::state::AppState;

pub fn buyer_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_buyers).post(create_buyer))
        .route(
            "/{id}",
            get(get_buyer).patch(update_buyer).delete(delete_buyer),
        )
}

pub fn seller_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sellers).post(create_seller))
        .route(
            "/{id}",
            get(get_seller).patch(update_seller).delete(delete_seller),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// Buyer profiles
// ─────────────────────────────────────────────────────────────────────────────

async fn list_buyers(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filter): Query<ProfileFilter>,
) -> Result<Json<Page<ProfileRow<buyer_profile::Model>>>, AppError> {
    Ok(Json(
        ProfileService::list_buyers(&state.db, &filter, pagination).await?,
    ))
}

async fn get_buyer(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<buyer_profile::Model>, AppError> {
    Ok(Json(ProfileService::find_buyer(&state.db, id).await?))
}

async fn create_buyer(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<NewBuyerProfile>,
) -> Result<(StatusCode, Json<buyer_profile::Model>), AppError> {
    let created = ProfileService::create_buyer(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_buyer(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<BuyerProfileChanges>,
) -> Result<Json<buyer_profile::Model>, AppError> {
    Ok(Json(ProfileService::update_buyer(&state.db, id, body).await?))
}

async fn delete_buyer(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ProfileService::delete_buyer(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Seller profiles
// ─────────────────────────────────────────────────────────────────────────────

async fn list_sellers(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filter): Query<ProfileFilter>,
) -> Result<Json<Page<ProfileRow<seller_profile::Model>>>, AppError> {
    Ok(Json(
        ProfileService::list_sellers(&state.db, &filter, pagination).await?,
    ))
}

async fn get_seller(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<seller_profile::Model>, AppError> {
    Ok(Json(ProfileService::find_seller(&state.db, id).await?))
}

async fn create_seller(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<NewSellerProfile>,
) -> Result<(StatusCode, Json<seller_profile::Model>), AppError> {
    let created = ProfileService::create_seller(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_seller(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SellerProfileChanges>,
) -> Result<Json<seller_profile::Model>, AppError> {
    Ok(Json(ProfileService::update_seller(&state.db, id, body).await?))
}

async fn delete_seller(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ProfileService::delete_seller(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
