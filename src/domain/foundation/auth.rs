//! Caller identity.
//!
//! `AuthenticatedUser` is what a `SessionValidator` vouches for after
//! checking a bearer token. Trusted backend functions act on its `id`, never
//! on a user id supplied in the request body.

use super::UserId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Subject of the token.
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    /// Premium claim, when the identity provider sets one.
    pub premium: bool,
}

impl AuthenticatedUser {
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        display_name: Option<String>,
        premium: bool,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            premium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Malformed token, bad signature, wrong issuer or audience.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// Validation could not be attempted (key fetch, misconfiguration).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}
