//! Pharmacy, staff roster and billing handlers.
//!
//! Role and pharmacy-scope checks happen in the authorization layer before
//! any of these run; handlers only forward to the service.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::{ApiPath, ApiQuery, ValidatedJson};
use crate::api::AppState;
use crate::domain::{
    ActivityItem, AddStaff, Bill, CreatePharmacy, NewBill, PharmacyResponse, PharmacyUpdate,
    Principal, StaffResponse, StaffUpdate,
};
use crate::errors::AppResult;

/// Query parameters for the activity feed
#[derive(Debug, Deserialize, IntoParams)]
pub struct ActivityQuery {
    /// Number of items, 1 to 50 (default 5)
    pub limit: Option<u64>,
}

/// Routes nested under `/api/pharmacies`
pub fn pharmacy_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pharmacies).post(create_pharmacy))
        .route("/mine", get(my_pharmacies))
        .route(
            "/:id",
            get(get_pharmacy).put(update_pharmacy).delete(delete_pharmacy),
        )
        .route("/:id/activity", get(pharmacy_activity))
        .route("/:id/staff", get(list_staff).post(add_staff))
        .route("/:id/staff/:staff_id", put(update_staff))
        .route("/:id/bills", get(list_bills).post(create_bill))
}

/// List every pharmacy (platform admins only)
#[utoipa::path(
    get,
    path = "/api/pharmacies",
    tag = "Pharmacies",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All pharmacies", body = [PharmacyResponse]),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
pub async fn list_pharmacies(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PharmacyResponse>>> {
    Ok(Json(state.pharmacy_service.list_all().await?))
}

/// Create a pharmacy owned by the caller
#[utoipa::path(
    post,
    path = "/api/pharmacies",
    tag = "Pharmacies",
    security(("bearer_auth" = [])),
    request_body = CreatePharmacy,
    responses(
        (status = 201, description = "Pharmacy created", body = PharmacyResponse),
        (status = 400, description = "Validation error or duplicate registration number", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
pub async fn create_pharmacy(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(input): ValidatedJson<CreatePharmacy>,
) -> AppResult<(StatusCode, Json<PharmacyResponse>)> {
    let pharmacy = state.pharmacy_service.create(&principal, input).await?;
    Ok((StatusCode::CREATED, Json(pharmacy)))
}

/// Pharmacies the caller owns or works at
#[utoipa::path(
    get,
    path = "/api/pharmacies/mine",
    tag = "Pharmacies",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's pharmacies", body = [PharmacyResponse]),
        (status = 403, description = "Pharmacy role required", body = ErrorResponse)
    )
)]
pub async fn my_pharmacies(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<Vec<PharmacyResponse>>> {
    Ok(Json(state.pharmacy_service.mine(&principal).await?))
}

#[utoipa::path(
    get,
    path = "/api/pharmacies/{id}",
    tag = "Pharmacies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Pharmacy ID")),
    responses(
        (status = 200, description = "Pharmacy", body = PharmacyResponse),
        (status = 404, description = "Not found or caller is not a member", body = ErrorResponse)
    )
)]
pub async fn get_pharmacy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<PharmacyResponse>> {
    Ok(Json(state.pharmacy_service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/pharmacies/{id}",
    tag = "Pharmacies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Pharmacy ID")),
    request_body = PharmacyUpdate,
    responses(
        (status = 200, description = "Pharmacy updated", body = PharmacyResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Not found or caller is not a pharmacy admin", body = ErrorResponse)
    )
)]
pub async fn update_pharmacy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(update): ValidatedJson<PharmacyUpdate>,
) -> AppResult<Json<PharmacyResponse>> {
    Ok(Json(state.pharmacy_service.update(id, update).await?))
}

/// Deactivate a pharmacy
#[utoipa::path(
    delete,
    path = "/api/pharmacies/{id}",
    tag = "Pharmacies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Pharmacy ID")),
    responses(
        (status = 204, description = "Pharmacy deactivated"),
        (status = 404, description = "Not found or caller is not a pharmacy admin", body = ErrorResponse)
    )
)]
pub async fn delete_pharmacy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<StatusCode> {
    state.pharmacy_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Latest bills as an activity feed
#[utoipa::path(
    get,
    path = "/api/pharmacies/{id}/activity",
    tag = "Pharmacies",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Pharmacy ID"), ActivityQuery),
    responses(
        (status = 200, description = "Recent activity", body = [ActivityItem]),
        (status = 400, description = "Limit out of range", body = ErrorResponse),
        (status = 404, description = "Not found or caller is not a member", body = ErrorResponse)
    )
)]
pub async fn pharmacy_activity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<ActivityQuery>,
) -> AppResult<Json<Vec<ActivityItem>>> {
    Ok(Json(state.pharmacy_service.activity(id, query.limit).await?))
}

#[utoipa::path(
    get,
    path = "/api/pharmacies/{id}/staff",
    tag = "Pharmacy Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Pharmacy ID")),
    responses(
        (status = 200, description = "Staff roster", body = [StaffResponse]),
        (status = 404, description = "Not found or caller is not a member", body = ErrorResponse)
    )
)]
pub async fn list_staff(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Vec<StaffResponse>>> {
    Ok(Json(state.pharmacy_service.list_staff(id).await?))
}

/// Add an existing account to the roster by email
#[utoipa::path(
    post,
    path = "/api/pharmacies/{id}/staff",
    tag = "Pharmacy Staff",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Pharmacy ID")),
    request_body = AddStaff,
    responses(
        (status = 201, description = "Staff member added", body = StaffResponse),
        (status = 400, description = "Validation error or already on the roster", body = ErrorResponse),
        (status = 404, description = "Pharmacy or user not found", body = ErrorResponse)
    )
)]
pub async fn add_staff(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(input): ValidatedJson<AddStaff>,
) -> AppResult<(StatusCode, Json<StaffResponse>)> {
    let staff = state.pharmacy_service.add_staff(id, input).await?;
    Ok((StatusCode::CREATED, Json(staff)))
}

/// Change a staff member's role or active flag
#[utoipa::path(
    put,
    path = "/api/pharmacies/{id}/staff/{staff_id}",
    tag = "Pharmacy Staff",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Pharmacy ID"),
        ("staff_id" = Uuid, Path, description = "Staff row ID")
    ),
    request_body = StaffUpdate,
    responses(
        (status = 200, description = "Staff member updated", body = StaffResponse),
        (status = 404, description = "Pharmacy or staff member not found", body = ErrorResponse)
    )
)]
pub async fn update_staff(
    State(state): State<AppState>,
    ApiPath((id, staff_id)): ApiPath<(Uuid, Uuid)>,
    ValidatedJson(update): ValidatedJson<StaffUpdate>,
) -> AppResult<Json<StaffResponse>> {
    Ok(Json(
        state
            .pharmacy_service
            .update_staff(id, staff_id, update)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/pharmacies/{id}/bills",
    tag = "Pharmacy Billing",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Pharmacy ID")),
    responses(
        (status = 200, description = "Bills, newest first", body = [Bill]),
        (status = 404, description = "Not found or caller is not a member", body = ErrorResponse)
    )
)]
pub async fn list_bills(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Vec<Bill>>> {
    Ok(Json(state.pharmacy_service.list_bills(id).await?))
}

/// Record a sale
#[utoipa::path(
    post,
    path = "/api/pharmacies/{id}/bills",
    tag = "Pharmacy Billing",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Pharmacy ID")),
    request_body = NewBill,
    responses(
        (status = 201, description = "Bill recorded", body = Bill),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Not found or caller is not a member", body = ErrorResponse)
    )
)]
pub async fn create_bill(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(bill): ValidatedJson<NewBill>,
) -> AppResult<(StatusCode, Json<Bill>)> {
    let bill = state.pharmacy_service.create_bill(&principal, id, bill).await?;
    Ok((StatusCode::CREATED, Json(bill)))
}
