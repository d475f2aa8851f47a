use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

use crate::auth::middleware::AdminUser;
use crate::entities::user;
use crate::error::AppError;
use crate::services::accounts::{NewUser, UserChanges, UserDetail, UserFilter, UserService};
use crate::services::{Page, Pagination};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filter): Query<UserFilter>,
) -> Result<Json<Page<user::Model>>, AppError> {
    Ok(Json(UserService::list(&state.db, &filter, pagination).await?))
}

async fn get_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDetail>, AppError> {
    Ok(Json(UserService::detail(&state.db, id).await?))
}

async fn create_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<NewUser>,
) -> Result<(StatusCode, Json<user::Model>), AppError> {
    let created = UserService::create(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UserChanges>,
) -> Result<Json<user::Model>, AppError> {
    Ok(Json(UserService::update(&state.db, id, body).await?))
}

async fn delete_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if admin.id == id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account.".to_string(),
        ));
    }
    UserService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
