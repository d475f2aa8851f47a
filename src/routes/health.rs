use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

/// `GET /health`: liveness only, never touches the database.
async fn health_root() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        database: None,
    })
}

/// `GET /api/v1/health`: pings the database and reports 503 when it is unreachable.
async fn health_api(State(state): State<AppState>) -> impl IntoResponse {
    let (status, database) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "connected"),
        Err(err) => {
            tracing::warn!(error = %err, "Database ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "disconnected")
        }
    };

    let body = HealthResponse {
        status: if status == StatusCode::OK { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database: Some(database),
    };

    (status, Json(body))
}

pub fn root_router() -> Router<AppState> {
    Router::new().route("/health", get(health_root))
}

pub fn api_router() -> Router<AppState> {
    Router::new().route("/health", get(health_api))
}
