use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sea_orm::EntityTrait;

use crate::auth::jwt;
use crate::entities::user;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// ```ignore
/// async fn handler(AuthUser(user): AuthUser) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing authorization header.".to_string()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid authorization header format.".to_string())
        })?;

        let claims = jwt::validate_access_token(token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token.".to_string()))?;

        let user_id: uuid::Uuid = claims
            .sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Invalid token subject.".to_string()))?;

        let user_model = user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found.".to_string()))?;

        if !user_model.is_active {
            return Err(AppError::Forbidden("Account is inactive.".to_string()));
        }

        Ok(Self(user_model))
    }
}

/// Optional authentication: a missing or invalid token yields `None` instead of a rejection.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<user::Model>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(AuthUser(u)) => Ok(Self(Some(u))),
            Err(_) => Ok(Self(None)),
        }
    }
}

/// Requires the authenticated user to hold the `admin` or `superadmin` role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub user::Model);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_model) = AuthUser::from_request_parts(parts, state).await?;

        if !user_model.role.is_staff() {
            return Err(AppError::Forbidden("Admin role required.".to_string()));
        }

        Ok(Self(user_model))
    }
}
