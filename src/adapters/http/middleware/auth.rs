//! Bearer-token authentication for the function service.
//!
//! `auth_middleware` resolves the `Authorization: Bearer` token through the
//! `SessionValidator` port and stores the `AuthenticatedUser` in request
//! extensions. Handlers read it back with `OptionalAuth` and decide for
//! themselves how to treat anonymous callers.
//!
//! A missing token passes through. A token that fails validation is
//! rejected here with the callable error envelope, so function clients
//! parse it like any other function error.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::functions::dto::CallableErrorResponse;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Validator shared by every request.
pub type AuthState = Arc<dyn SessionValidator>;

/// Validates the bearer token, if any, and attaches the caller.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        return next.run(request).await;
    };

    match validator.validate(token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => rejection(&err),
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn rejection(err: &AuthError) -> Response {
    let (status, code, message) = match err {
        AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", "Token expired"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", "Invalid token"),
        AuthError::ServiceUnavailable(reason) => {
            tracing::error!(reason = %reason, "Session validation unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "UNAVAILABLE",
                "Authentication service unavailable",
            )
        }
    };
    (status, Json(CallableErrorResponse::new(code, message))).into_response()
}

/// The caller attached by `auth_middleware`, or `None` for anonymous
/// requests.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::domain::foundation::UserId;
    use axum::body::Body;
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("user-123").unwrap(),
            "test@example.com",
            Some("Test User".to_string()),
            true,
        )
    }

    async fn whoami(OptionalAuth(user): OptionalAuth) -> String {
        user.map(|u| u.email).unwrap_or_else(|| "anonymous".to_string())
    }

    fn app(validator: MockSessionValidator) -> Router {
        let state: AuthState = Arc::new(validator);
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    async fn call(app: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Middleware Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn valid_token_injects_user() {
        let validator = MockSessionValidator::new().with_user("valid-token", test_user());
        let (status, body) = call(app(validator), Some("Bearer valid-token")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "test@example.com");
    }

    #[tokio::test]
    async fn missing_token_continues_anonymously() {
        let (status, body) = call(app(MockSessionValidator::new()), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_ignored() {
        let (status, body) =
            call(app(MockSessionValidator::new()), Some("Basic dXNlcjpwYXNz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn invalid_token_is_rejected_with_callable_error() {
        let (status, body) = call(app(MockSessionValidator::new()), Some("Bearer nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let parsed: CallableErrorResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed.error.status, "UNAUTHENTICATED");
        assert_eq!(parsed.error.message, "Invalid token");
    }

    #[tokio::test]
    async fn unavailable_provider_is_503() {
        let validator = MockSessionValidator::new()
            .with_error(AuthError::ServiceUnavailable("jwks timeout".to_string()));
        let (status, _) = call(app(validator), Some("Bearer anything")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Type Safety Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn auth_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AuthState>();
    }

    #[test]
    fn optional_auth_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OptionalAuth>();
    }
}
