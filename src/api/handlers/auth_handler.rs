//! Authentication handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::Principal;
use crate::errors::AppResult;
use crate::services::{
    AuthResponse, LoginRequest, PharmacyAuthResponse, PharmacySignupRequest, SignupRequest,
    ValidateResponse,
};

/// Public authentication routes, nested under `/auth`
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/pharmacy/signup", post(pharmacy_signup))
        .route("/pharmacy/login", post(pharmacy_login))
}

/// Token introspection. Needs a bearer token, so it lives with the protected routes.
pub fn session_routes() -> Router<AppState> {
    Router::new().route("/auth/validate", get(validate))
}

/// Register a patient account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Validation error or email in use", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let response = state.auth_service.signup(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Patient login
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials or wrong account type", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(state.auth_service.login(payload).await?))
}

/// Register a pharmacy together with its administrator
#[utoipa::path(
    post,
    path = "/auth/pharmacy/signup",
    tag = "Authentication",
    request_body = PharmacySignupRequest,
    responses(
        (status = 201, description = "Pharmacy and admin account created", body = PharmacyAuthResponse),
        (status = 400, description = "Validation error, email in use or duplicate registration number", body = ErrorResponse)
    )
)]
pub async fn pharmacy_signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PharmacySignupRequest>,
) -> AppResult<(StatusCode, Json<PharmacyAuthResponse>)> {
    let response = state.auth_service.pharmacy_signup(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Pharmacy staff login
#[utoipa::path(
    post,
    path = "/auth/pharmacy/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = PharmacyAuthResponse),
        (status = 401, description = "Invalid credentials or no staff assignment", body = ErrorResponse)
    )
)]
pub async fn pharmacy_login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<PharmacyAuthResponse>> {
    Ok(Json(state.auth_service.pharmacy_login(payload).await?))
}

/// Describe the account behind the bearer token
#[utoipa::path(
    get,
    path = "/auth/validate",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token is valid", body = ValidateResponse),
        (status = 401, description = "Missing, invalid or unsupported token", body = ErrorResponse)
    )
)]
pub async fn validate(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<ValidateResponse>> {
    Ok(Json(state.auth_service.validate(&principal).await?))
}
