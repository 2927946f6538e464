//! Route-table authorization.
//!
//! Runs after authentication on every protected route. The rule is looked up
//! by method and matched route template; the pharmacy scope is keyed by the
//! `id` path parameter, or the `pharmacyId` query parameter when the path
//! has none.

use std::collections::HashMap;

use axum::{
    extract::{MatchedPath, Query, RawPathParams, Request, State},
    http::Uri,
    middleware::Next,
    response::Response,
    Extension,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::Principal;
use crate::errors::AppError;
use crate::policy::{evaluate, rule_for};

const PATH_PHARMACY_ID: &str = "id";
const QUERY_PHARMACY_ID: &str = "pharmacyId";

pub async fn authorize_middleware(
    State(state): State<AppState>,
    matched: Option<MatchedPath>,
    params: Option<RawPathParams>,
    principal: Option<Extension<Principal>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(Extension(principal)) = principal else {
        return Err(AppError::unauthorized("Authentication required"));
    };

    let method = request.method().as_str();
    let Some(path) = matched.as_ref().map(MatchedPath::as_str) else {
        tracing::warn!(method, uri = %request.uri(), "No matched route, denying");
        return Err(AppError::Forbidden);
    };
    let Some(rule) = rule_for(method, path) else {
        tracing::warn!(method, path, user_id = %principal.id, "Route missing from access table, denying");
        return Err(AppError::Forbidden);
    };

    let pharmacy_id = pharmacy_id(params.as_ref(), request.uri());
    evaluate(rule, &principal, pharmacy_id, state.ownership.as_ref()).await?;

    Ok(next.run(request).await)
}

/// Pharmacy id named by the request; `None` when absent or not a UUID
fn pharmacy_id(params: Option<&RawPathParams>, uri: &Uri) -> Option<Uuid> {
    let from_path = params.and_then(|params| {
        params
            .iter()
            .find(|(key, _)| *key == PATH_PHARMACY_ID)
            .map(|(_, value)| value.to_string())
    });

    let raw = from_path.or_else(|| {
        Query::<HashMap<String, String>>::try_from_uri(uri)
            .ok()
            .and_then(|Query(mut query)| query.remove(QUERY_PHARMACY_ID))
    })?;

    Uuid::parse_str(raw.trim()).ok()
}
