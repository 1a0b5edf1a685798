//! Mock session validator for testing.
//!
//! Accepts a fixed set of tokens so handler and HTTP tests can run without
//! minting real JWTs.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Token-to-user map. Unknown tokens are `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.write().unwrap().insert(token.into(), user);
        self
    }

    /// Free-tier user `<user_id>@test.example.com`.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user = test_user(user_id.into(), false);
        self.with_user(token, user)
    }

    /// Same as `with_test_user` with the premium claim set.
    pub fn with_premium_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user = test_user(user_id.into(), true);
        self.with_user(token, user)
    }

    /// Every validation fails with `error` until cleared.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    pub fn revoke(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }
}

fn test_user(user_id: String, premium: bool) -> AuthenticatedUser {
    AuthenticatedUser::new(
        UserId::new(user_id.as_str()).unwrap(),
        format!("{}@test.example.com", user_id),
        None,
        premium,
    )
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
