use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AdminUser;
use crate::entities::message;
use crate::error::AppError;
use crate::services::messaging::{
    MessageChanges, MessageFilter, MessageRow, MessageService, NewMessage,
};
use crate::services::{BulkOutcome, BulkRequest, Page, Pagination};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_messages).post(create_message))
        .route(
            "/{id}",
            get(get_message).patch(update_message).delete(delete_message),
        )
        .route("/{id}/read", post(mark_one_read))
        .route("/actions/mark_as_read", post(mark_as_read))
        .route("/actions/mark_as_unread", post(mark_as_unread))
}

#[derive(Serialize)]
struct MarkReadResponse {
    changed: bool,
}

async fn list_messages(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filter): Query<MessageFilter>,
) -> Result<Json<Page<MessageRow>>, AppError> {
    Ok(Json(MessageService::list(&state.db, &filter, pagination).await?))
}

async fn get_message(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<message::Model>, AppError> {
    Ok(Json(MessageService::find(&state.db, id).await?))
}

async fn create_message(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<NewMessage>,
) -> Result<(StatusCode, Json<message::Model>), AppError> {
    let created = MessageService::send(&state.db, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_message(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<MessageChanges>,
) -> Result<Json<message::Model>, AppError> {
    Ok(Json(MessageService::update(&state.db, id, body).await?))
}

async fn delete_message(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    MessageService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_one_read(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MarkReadResponse>, AppError> {
    let changed = MessageService::mark_as_read(&state.db, id).await?;
    Ok(Json(MarkReadResponse { changed }))
}

async fn mark_as_read(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<BulkRequest>,
) -> Result<Json<BulkOutcome>, AppError> {
    Ok(Json(
        MessageService::mark_read_state(&state.db, &body.ids, true).await?,
    ))
}

async fn mark_as_unread(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(body): Json<BulkRequest>,
) -> Result<Json<BulkOutcome>, AppError> {
    Ok(Json(
        MessageService::mark_read_state(&state.db, &body.ids, false).await?,
    ))
}
