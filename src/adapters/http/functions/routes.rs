//! Axum router configuration for backend function endpoints.

use axum::{routing::post, Router};

use super::handlers::{create_payment_intent, FunctionsAppState};

/// Function routes, one per callable name.
///
/// # Routes
/// - `POST /createPaymentIntent` - Create a Stripe payment intent
pub fn functions_routes() -> Router<FunctionsAppState> {
    Router::new().route("/createPaymentIntent", post(create_payment_intent))
}

/// Function routes mounted at `/functions`.
pub fn functions_router() -> Router<FunctionsAppState> {
    Router::new().nest("/functions", functions_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::adapters::stripe::MockPaymentIntentService;

    fn state() -> FunctionsAppState {
        FunctionsAppState::new(Arc::new(MockPaymentIntentService::new()))
    }

    #[test]
    fn functions_router_creates_router() {
        let _: Router<()> = functions_router().with_state(state());
    }

    #[tokio::test]
    async fn anonymous_call_is_unauthenticated() {
        let app = functions_router().with_state(state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/functions/createPaymentIntent")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "data": {} }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
