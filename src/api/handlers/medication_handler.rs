//! Medication handlers. Every lookup is scoped to the caller.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::{ApiPath, ValidatedJson};
use crate::api::AppState;
use crate::domain::{Medication, MedicationInput, Principal};
use crate::errors::AppResult;

/// Routes nested under `/api/medications`
pub fn medication_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_medications).post(create_medication))
        .route("/active", get(list_active_medications))
        .route(
            "/:id",
            get(get_medication)
                .put(update_medication)
                .delete(delete_medication),
        )
}

#[utoipa::path(
    get,
    path = "/api/medications",
    tag = "Medications",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Caller's medications", body = [Medication]))
)]
pub async fn list_medications(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<Vec<Medication>>> {
    Ok(Json(state.medication_service.list(&principal).await?))
}

#[utoipa::path(
    get,
    path = "/api/medications/active",
    tag = "Medications",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Active medications", body = [Medication]))
)]
pub async fn list_active_medications(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<Vec<Medication>>> {
    Ok(Json(state.medication_service.list_active(&principal).await?))
}

#[utoipa::path(
    post,
    path = "/api/medications",
    tag = "Medications",
    security(("bearer_auth" = [])),
    request_body = MedicationInput,
    responses(
        (status = 201, description = "Medication created", body = Medication),
        (status = 400, description = "Validation error", body = ErrorResponse)
    )
)]
pub async fn create_medication(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(input): ValidatedJson<MedicationInput>,
) -> AppResult<(StatusCode, Json<Medication>)> {
    let medication = state.medication_service.create(&principal, input).await?;
    Ok((StatusCode::CREATED, Json(medication)))
}

#[utoipa::path(
    get,
    path = "/api/medications/{id}",
    tag = "Medications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Medication ID")),
    responses(
        (status = 200, description = "Medication", body = Medication),
        (status = 404, description = "Not found or not owned by the caller", body = ErrorResponse)
    )
)]
pub async fn get_medication(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Medication>> {
    Ok(Json(state.medication_service.get(&principal, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/medications/{id}",
    tag = "Medications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Medication ID")),
    request_body = MedicationInput,
    responses(
        (status = 200, description = "Medication updated", body = Medication),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Not found or not owned by the caller", body = ErrorResponse)
    )
)]
pub async fn update_medication(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<MedicationInput>,
) -> AppResult<Json<Medication>> {
    Ok(Json(state.medication_service.update(&principal, id, input).await?))
}

/// Hard delete; the medication's reminders go with it
#[utoipa::path(
    delete,
    path = "/api/medications/{id}",
    tag = "Medications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Medication ID")),
    responses(
        (status = 204, description = "Medication deleted"),
        (status = 404, description = "Not found or not owned by the caller", body = ErrorResponse)
    )
)]
pub async fn delete_medication(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    state.medication_service.delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
