//! Account handlers for the authenticated caller.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Principal, ProfileUpdate, UserResponse};
use crate::errors::AppResult;

/// Routes nested under `/api/users`
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user))
        .route("/profile", get(get_profile).put(update_profile))
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.me(&principal).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.me(&principal).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Change the caller's first and last name
#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(update): ValidatedJson<ProfileUpdate>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.update_profile(&principal, update).await?;
    Ok(Json(UserResponse::from(user)))
}
