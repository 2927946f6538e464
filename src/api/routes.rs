//! Application route configuration.

use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use futures::future::join_all;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    analytics_routes, auth_routes, donation_routes, medication_routes, pharmacy_routes,
    reminder_routes, rewards_routes, session_routes, user_routes,
};
use super::middleware::{
    auth_middleware, authorize_middleware, rate_limit_auth_middleware, rate_limit_middleware,
};
use super::openapi::ApiDoc;
use super::AppState;
use crate::errors::AppError;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoints (no rate limiting)
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public authentication routes (stricter rate limiting)
        .nest(
            "/auth",
            auth_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_auth_middleware,
            )),
        )
        .merge(protected_routes(state.clone()))
        .fallback(route_not_found)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

/// Everything behind a bearer token.
///
/// Route layers run bottom-up. Authorization is applied after nesting so it
/// sees the full matched path.
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(session_routes())
        .nest("/api/users", user_routes())
        .nest("/api/medications", medication_routes())
        .nest("/api/pharmacies", pharmacy_routes())
        .nest("/api/analytics", analytics_routes())
        .nest("/api/rewards", rewards_routes())
        .nest("/reminders", reminder_routes())
        .nest("/donations", donation_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authorize_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(state, rate_limit_middleware))
}

/// Root endpoint
async fn root() -> &'static str {
    "Welcome to PharmaCare API"
}

/// Unmatched paths answer with the regular error body
async fn route_not_found() -> AppError {
    AppError::not_found("Route")
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: BTreeMap<&'static str, &'static str>,
}

/// Probe every dependency; 503 when any of them is down
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let results = join_all(state.health_checks.iter().map(|check| async move {
        (check.component(), check.is_healthy().await)
    }))
    .await;

    let all_healthy = results.iter().all(|(_, healthy)| *healthy);
    let services = results
        .into_iter()
        .map(|(name, healthy)| (name, if healthy { "healthy" } else { "unhealthy" }))
        .collect();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services,
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
