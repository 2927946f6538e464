//! Reminder handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::{ApiPath, ApiQuery, ValidatedJson};
use crate::api::AppState;
use crate::domain::{CreateReminder, Principal, ReminderResponse, ReminderWindow, UpdateReminder};
use crate::errors::AppResult;

/// Routes nested under `/reminders`
pub fn reminder_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reminders).post(create_reminder))
        .route("/pending", get(pending_reminders))
        .route(
            "/:id",
            get(get_reminder).put(update_reminder).delete(delete_reminder),
        )
        .route("/:id/complete", post(complete_reminder))
}

#[utoipa::path(
    get,
    path = "/reminders",
    tag = "Reminders",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Caller's reminders", body = [ReminderResponse]))
)]
pub async fn list_reminders(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<Vec<ReminderResponse>>> {
    Ok(Json(state.reminder_service.list(&principal).await?))
}

/// Open reminders, optionally between `start` and `end` (ISO local date-times)
#[utoipa::path(
    get,
    path = "/reminders/pending",
    tag = "Reminders",
    security(("bearer_auth" = [])),
    params(
        ("start" = Option<String>, Query, description = "Window start, e.g. 2024-03-01T00:00:00"),
        ("end" = Option<String>, Query, description = "Window end, e.g. 2024-03-02T00:00:00")
    ),
    responses(
        (status = 200, description = "Open reminders", body = [ReminderResponse]),
        (status = 400, description = "Malformed date-time", body = ErrorResponse)
    )
)]
pub async fn pending_reminders(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiQuery(window): ApiQuery<ReminderWindow>,
) -> AppResult<Json<Vec<ReminderResponse>>> {
    Ok(Json(state.reminder_service.pending(&principal, window).await?))
}

#[utoipa::path(
    post,
    path = "/reminders",
    tag = "Reminders",
    security(("bearer_auth" = [])),
    request_body = CreateReminder,
    responses(
        (status = 201, description = "Reminder created", body = ReminderResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Medication not found", body = ErrorResponse)
    )
)]
pub async fn create_reminder(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(input): ValidatedJson<CreateReminder>,
) -> AppResult<(StatusCode, Json<ReminderResponse>)> {
    let reminder = state.reminder_service.create(&principal, input).await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

#[utoipa::path(
    get,
    path = "/reminders/{id}",
    tag = "Reminders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Reminder ID")),
    responses(
        (status = 200, description = "Reminder", body = ReminderResponse),
        (status = 404, description = "Not found or not owned by the caller", body = ErrorResponse)
    )
)]
pub async fn get_reminder(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ReminderResponse>> {
    Ok(Json(state.reminder_service.get(&principal, id).await?))
}

#[utoipa::path(
    put,
    path = "/reminders/{id}",
    tag = "Reminders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Reminder ID")),
    request_body = UpdateReminder,
    responses(
        (status = 200, description = "Reminder updated", body = ReminderResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Reminder or medication not found", body = ErrorResponse)
    )
)]
pub async fn update_reminder(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<UpdateReminder>,
) -> AppResult<Json<ReminderResponse>> {
    Ok(Json(state.reminder_service.update(&principal, id, input).await?))
}

#[utoipa::path(
    delete,
    path = "/reminders/{id}",
    tag = "Reminders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Reminder ID")),
    responses(
        (status = 204, description = "Reminder deleted"),
        (status = 404, description = "Not found or not owned by the caller", body = ErrorResponse)
    )
)]
pub async fn delete_reminder(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    state.reminder_service.delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a reminder completed. Repeating the call changes nothing.
#[utoipa::path(
    post,
    path = "/reminders/{id}/complete",
    tag = "Reminders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Reminder ID")),
    responses(
        (status = 200, description = "Reminder completed", body = ReminderResponse),
        (status = 404, description = "Not found or not owned by the caller", body = ErrorResponse)
    )
)]
pub async fn complete_reminder(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<ReminderResponse>> {
    Ok(Json(state.reminder_service.complete(&principal, id).await?))
}
