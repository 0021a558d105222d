//! Top-level application router.

use axum::{middleware, routing::get, Json, Router};
use serde_json::{json, Value};

use super::enrollment::{enrollment_routes, EnrollmentHandlers};
use super::middleware::{auth_middleware, AuthState};

/// GET /health - Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the API: enrollment routes under `/api` behind the auth layer,
/// plus an unauthenticated `/health`.
///
/// Cross-cutting layers (tracing, timeouts, CORS) are added by the binary.
pub fn app_router(handlers: EnrollmentHandlers, auth: AuthState) -> Router {
    let api = enrollment_routes(handlers)
        .layer(middleware::from_fn_with_state(auth, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
}
