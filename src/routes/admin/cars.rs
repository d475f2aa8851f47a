use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::auth::middleware::AdminUser;
use crate::entities::car;
use crate::error::AppError;
use crate::services::catalog::{CarChanges, CarDetail, CarFilter, CarRow, CarService, NewCar};
use crate::services::{Page, Pagination};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cars).post(create_car))
        .route("/{id}", get(get_car).patch(update_car).delete(delete_car))
}

async fn list_cars(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filter): Query<CarFilter>,
) -> Result<Json<Page<CarRow>>, AppError> {
    Ok(Json(CarService::list(&state.db, &filter, pagination).await?))
}

async fn get_car(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CarDetail>, AppError> {
    Ok(Json(CarService::detail(&state.db, id).await?))
}

async fn create_car(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<NewCar>,
) -> Result<(StatusCode, Json<car::Model>), AppError> {
    let created = CarService::create(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_car(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CarChanges>,
) -> Result<Json<car::Model>, AppError> {
    Ok(Json(CarService::update(&state.db, id, body).await?))
}

async fn delete_car(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    CarService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
