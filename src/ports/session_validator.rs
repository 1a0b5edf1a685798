//! Bearer token validation.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Resolves an access token to the caller it was issued to.
///
/// Implementations check signature, issuer, audience and expiry, and report
/// `TokenExpired` separately from other rejections so clients can refresh.
/// `ServiceUnavailable` is reserved for failures that say nothing about the
/// token itself.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// `token` is the raw value after `Bearer `.
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use std::sync::Arc;

    #[tokio::test]
    async fn validator_is_usable_behind_arc_dyn() {
        let validator: Arc<dyn SessionValidator> =
            Arc::new(MockSessionValidator::new().with_test_user("t-1", "traveller-7"));

        let user = validator.validate("t-1").await.unwrap();
        assert_eq!(user.id.as_str(), "traveller-7");
        assert_eq!(validator.validate("t-2").await, Err(AuthError::InvalidToken));
    }
}
