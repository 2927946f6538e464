//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Extracts and validates the bearer token, then injects the `Principal`
/// into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("Missing or malformed bearer token"))?;

    let principal = state.auth_service.verify_token(token)?;
    tracing::debug!(user_id = %principal.id, "Authenticated request");

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}
