//! HTTP adapters - REST API implementations.
//!
//! The service hosts the trusted backend functions behind bearer-token
//! authentication, plus an unauthenticated health probe.

pub mod functions;
pub mod middleware;

use std::time::Duration;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use functions::{functions_router, FunctionsAppState};
pub use middleware::{auth_middleware, AuthState, OptionalAuth};

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Full application router: functions behind auth, health, tracing, CORS
/// and a request timeout.
pub fn app_router(
    functions: FunctionsAppState,
    validator: AuthState,
    cors: CorsLayer,
    request_timeout: Duration,
) -> Router {
    let api = functions_router()
        .with_state(functions)
        .layer(from_fn_with_state(validator, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
