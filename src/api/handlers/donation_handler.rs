//! Donation handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::{ApiPath, ValidatedJson};
use crate::api::AppState;
use crate::domain::{DonationInput, DonationResponse, Principal, StatusUpdate};
use crate::errors::AppResult;

/// Routes nested under `/donations`
pub fn donation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_donations).post(create_donation))
        .route("/pending", get(pending_donations))
        .route(
            "/:id",
            get(get_donation).put(update_donation).delete(delete_donation),
        )
        .route("/:id/status", put(update_donation_status))
}

#[utoipa::path(
    get,
    path = "/donations",
    tag = "Donations",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Caller's donations", body = [DonationResponse]))
)]
pub async fn list_donations(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<Vec<DonationResponse>>> {
    Ok(Json(state.donation_service.list(&principal).await?))
}

#[utoipa::path(
    get,
    path = "/donations/pending",
    tag = "Donations",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Caller's pending donations", body = [DonationResponse]))
)]
pub async fn pending_donations(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<Vec<DonationResponse>>> {
    Ok(Json(state.donation_service.pending(&principal).await?))
}

#[utoipa::path(
    post,
    path = "/donations",
    tag = "Donations",
    security(("bearer_auth" = [])),
    request_body = DonationInput,
    responses(
        (status = 201, description = "Donation created", body = DonationResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn create_donation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(input): ValidatedJson<DonationInput>,
) -> AppResult<(StatusCode, Json<DonationResponse>)> {
    let donation = state.donation_service.create(&principal, input).await?;
    Ok((StatusCode::CREATED, Json(donation)))
}

#[utoipa::path(
    get,
    path = "/donations/{id}",
    tag = "Donations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Donation ID")),
    responses(
        (status = 200, description = "Donation", body = DonationResponse),
        (status = 404, description = "Not found or not owned by the caller", body = ErrorResponse)
    )
)]
pub async fn get_donation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<DonationResponse>> {
    Ok(Json(state.donation_service.get(&principal, id).await?))
}

/// Edit a donation that is still PENDING
#[utoipa::path(
    put,
    path = "/donations/{id}",
    tag = "Donations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Donation ID")),
    request_body = DonationInput,
    responses(
        (status = 200, description = "Donation updated", body = DonationResponse),
        (status = 400, description = "Validation error or donation no longer pending", body = ErrorResponse),
        (status = 404, description = "Not found or not owned by the caller", body = ErrorResponse)
    )
)]
pub async fn update_donation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<DonationInput>,
) -> AppResult<Json<DonationResponse>> {
    Ok(Json(state.donation_service.update(&principal, id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/donations/{id}",
    tag = "Donations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Donation ID")),
    responses(
        (status = 204, description = "Donation deleted"),
        (status = 400, description = "Donation no longer pending", body = ErrorResponse),
        (status = 404, description = "Not found or not owned by the caller", body = ErrorResponse)
    )
)]
pub async fn delete_donation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    state.donation_service.delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a donation through its lifecycle
#[utoipa::path(
    put,
    path = "/donations/{id}/status",
    tag = "Donations",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Donation ID")),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Status changed", body = DonationResponse),
        (status = 400, description = "Missing, unknown or disallowed status", body = ErrorResponse),
        (status = 404, description = "Not found or not owned by the caller", body = ErrorResponse)
    )
)]
pub async fn update_donation_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(update): ValidatedJson<StatusUpdate>,
) -> AppResult<Json<DonationResponse>> {
    Ok(Json(
        state
            .donation_service
            .update_status(&principal, id, update)
            .await?,
    ))
}
