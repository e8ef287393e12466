// Dashboard metrics and health routes

use axum::{extract::State, routing::get, Json, Router};
use chatlog_core::{DailyStats, HealthReport};
use chrono::Local;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppState;

/// Response wrapper for the daily stats
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub success: bool,
    pub data: DailyStats,
}

/// Create stats and health routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/stats", get(get_stats))
        .route("/api/health", get(health))
        .with_state(state)
}

/// GET /api/stats - Activity since local midnight
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Today's totals", body = StatsResponse)
    ),
    tag = "stats"
)]
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let data = state.store.compute_stats(&Local::now()).await;
    Json(StatsResponse {
        success: true,
        data,
    })
}

/// GET /api/health - Liveness and store sizes
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthReport)
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.store.health().await)
}
