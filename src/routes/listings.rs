use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extract_client_ip;
use crate::auth::middleware::OptionalAuth;
use crate::entities::car_listing::ListingStatus;
use crate::error::AppError;
use crate::services::analytics::{NewSearchLog, SearchLogService};
use crate::services::catalog::{ListingRow, ListingService};
use crate::services::{Page, Pagination, search_term};
use crate::state::AppState;

/// Public listing routes: `/listings/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search_listings))
        .route("/{id}", get(get_listing))
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    q: Option<String>,
    status: Option<ListingStatus>,
}

/// `GET /listings?q=&status=&offset=&limit=`
///
/// Every search with a non-blank `q` is logged with its result count, the caller's IP and,
/// when a valid bearer token is present, the caller.
async fn search_listings(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    headers: HeaderMap,
    Query(pagination): Query<Pagination>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Page<ListingRow>>, AppError> {
    let page = ListingService::search(&state.db, query.q.as_deref(), query.status, pagination).await?;

    if let Some(term) = search_term(query.q.as_deref()) {
        let log = NewSearchLog {
            query: term.chars().take(255).collect(),
            results_count: i32::try_from(page.total).unwrap_or(i32::MAX),
            user_id: viewer.as_ref().map(|u| u.id),
            ip_address: extract_client_ip(&headers),
        };
        // A failed log write must not fail the search.
        if let Err(err) = SearchLogService::record(&state.db, log).await {
            tracing::warn!(error = %err, "Failed to record search");
        }
    }

    Ok(Json(page))
}

/// `GET /listings/{id}`: counts as one view. Pending and rejected listings are hidden.
async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListingRow>, AppError> {
    let listing = ListingService::find(&state.db, id).await?;
    if !listing.status.is_public() {
        return Err(AppError::NotFound(format!("Listing {id} not found.")));
    }
    ListingService::increment_views(&state.db, id).await?;
    Ok(Json(ListingService::detail(&state.db, id).await?))
}
