//! Analytics handlers.

use axum::{
    extract::State,
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::ApiQuery;
use crate::api::AppState;
use crate::domain::{
    AdherenceBreakdown, MedicationBreakdown, Principal, SalesSummary, UserDashboard,
};
use crate::errors::{AppError, AppResult};

#[derive(Debug, Deserialize, IntoParams)]
pub struct AdherenceQuery {
    /// Look-back window in days, 1 to 365 (default 7)
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SalesQuery {
    pub pharmacy_id: Option<Uuid>,
    /// `today`, `week`, `month` or `year`; anything else means `week`
    pub period: Option<String>,
}

/// Routes nested under `/api/analytics`
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(user_dashboard))
        .route("/user/dashboard", get(user_dashboard))
        .route("/user/adherence", get(user_adherence))
        .route("/user/medications", get(user_medications))
        .route("/sales/summary", get(sales_summary))
}

/// Reminder and medication counts with 7-day adherence.
/// Also served at `/api/analytics/dashboard`.
#[utoipa::path(
    get,
    path = "/api/analytics/user/dashboard",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Dashboard", body = UserDashboard))
)]
pub async fn user_dashboard(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<UserDashboard>> {
    Ok(Json(state.analytics_service.user_dashboard(&principal).await?))
}

#[utoipa::path(
    get,
    path = "/api/analytics/user/adherence",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    params(AdherenceQuery),
    responses(
        (status = 200, description = "Adherence by weekday and time of day", body = AdherenceBreakdown),
        (status = 400, description = "Days out of range", body = ErrorResponse)
    )
)]
pub async fn user_adherence(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ApiQuery(query): ApiQuery<AdherenceQuery>,
) -> AppResult<Json<AdherenceBreakdown>> {
    Ok(Json(
        state
            .analytics_service
            .adherence(&principal, query.days)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/analytics/user/medications",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Medications by status", body = MedicationBreakdown))
)]
pub async fn user_medications(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<MedicationBreakdown>> {
    Ok(Json(state.analytics_service.medications(&principal).await?))
}

/// Sales total of one pharmacy for the period
#[utoipa::path(
    get,
    path = "/api/analytics/sales/summary",
    tag = "Analytics",
    security(("bearer_auth" = [])),
    params(SalesQuery),
    responses(
        (status = 200, description = "Sales total", body = SalesSummary),
        (status = 403, description = "Pharmacy role required", body = ErrorResponse),
        (status = 404, description = "Pharmacy not found or caller is not a member", body = ErrorResponse)
    )
)]
pub async fn sales_summary(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SalesQuery>,
) -> AppResult<Json<SalesSummary>> {
    // Admins bypass the scope check, so the id may still be missing here
    let pharmacy_id = query
        .pharmacy_id
        .ok_or_else(|| AppError::bad_request("pharmacyId is required"))?;

    Ok(Json(
        state
            .analytics_service
            .sales_summary(pharmacy_id, query.period)
            .await?,
    ))
}
