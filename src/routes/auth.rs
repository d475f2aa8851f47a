use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::auth::jwt;
use crate::entities::user;
use crate::error::AppError;
use crate::services::accounts::UserService;
use crate::state::AppState;

/// Build the auth route group: `/auth/...`
pub fn router() -> Router<AppState> {
    Router::new().route("/signin", post(signin))
}

#[derive(Deserialize)]
pub struct SigninRequest {
    /// Username or email.
    pub login: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SigninResponse {
    pub token: String,
    pub user: user::Model,
}

/// `POST /auth/signin`
async fn signin(
    State(state): State<AppState>,
    Json(body): Json<SigninRequest>,
) -> Result<Json<SigninResponse>, AppError> {
    if body.login.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest(
            "Login and password are required.".to_string(),
        ));
    }

    let user = UserService::authenticate(&state.db, &body.login, &body.password).await?;
    let token = jwt::generate_access_token(user.id, user.role, &state.config)?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "User signed in");
    Ok(Json(SigninResponse { token, user }))
}
