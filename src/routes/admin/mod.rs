//! Administrative JSON surface under `/api/v1/admin`.
//!
//! Every handler takes [`AdminUser`](crate::auth::middleware::AdminUser), so a bearer
//! token for an `admin` or `superadmin` account is required throughout.

mod analytics;
mod cars;
mod favorites;
mod listings;
mod messages;
mod profiles;
mod reports;
mod search_logs;
mod users;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/buyer-profiles", profiles::buyer_router())
        .nest("/seller-profiles", profiles::seller_router())
        .nest("/cars", cars::router())
        .nest("/listings", listings::router())
        .nest("/favorites", favorites::router())
        .nest("/messages", messages::router())
        .nest("/reports", reports::router())
        .nest("/analytics", analytics::router())
        .nest("/search-logs", search_logs::router())
}
