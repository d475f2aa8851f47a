mod admin;
mod auth;
mod health;
mod listings;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health`: liveness check
/// - `GET /api/v1/health`: health check with database connectivity
/// - `/api/v1/auth/...`: sign-in
/// - `/api/v1/listings/...`: public search and listing detail
/// - `/api/v1/admin/...`: administrative CRUD and bulk actions
pub fn router() -> Router<AppState> {
    let api_v1 = Router::new()
        .merge(health::api_router())
        .nest("/auth", auth::router())
        .nest("/listings", listings::router())
        .nest("/admin", admin::router());

    Router::new()
        .merge(health::root_router())
        .nest("/api/v1", api_v1)
}
