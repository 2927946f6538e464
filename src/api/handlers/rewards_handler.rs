//! Rewards handlers.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::AppState;
use crate::domain::{Achievement, Principal, RewardsDashboard};
use crate::errors::AppResult;

/// Routes nested under `/api/rewards`
pub fn rewards_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(rewards_dashboard))
        .route("/achievements", get(achievements))
}

/// Points, level, streak and the reward catalog
#[utoipa::path(
    get,
    path = "/api/rewards/dashboard",
    tag = "Rewards",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Rewards dashboard", body = RewardsDashboard))
)]
pub async fn rewards_dashboard(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<RewardsDashboard>> {
    Ok(Json(state.rewards_service.dashboard(&principal).await?))
}

#[utoipa::path(
    get,
    path = "/api/rewards/achievements",
    tag = "Rewards",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Achievement progress", body = [Achievement]))
)]
pub async fn achievements(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<Vec<Achievement>>> {
    Ok(Json(state.rewards_service.achievements(&principal).await?))
}
