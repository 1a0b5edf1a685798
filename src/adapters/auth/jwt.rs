//! HS256 JWT session validator.
//!
//! Validates tokens signed with the shared secret configured for the
//! function service and maps their claims to `AuthenticatedUser`.
//!
//! Validated claims:
//! - **Issuer (iss)**: must match the configured issuer
//! - **Audience (aud)**: must contain the configured audience
//! - **Expiry (exp)**: must be in the future

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Token claims issued by the storefront's identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: String,
    pub iss: String,
    #[serde(default)]
    pub aud: Audience,
    /// Unix epoch seconds
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Premium subscription claim.
    #[serde(default)]
    pub premium: bool,
}

/// A single audience string or an array of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::None => false,
            Audience::Single(s) => s == expected,
            Audience::Multiple(v) => v.iter().any(|s| s == expected),
        }
    }
}

pub struct JwtSessionValidator {
    secret: SecretString,
    issuer: String,
    audience: String,
}

impl JwtSessionValidator {
    pub fn new(
        secret: SecretString,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret,
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "sub", "aud"]);
        validation
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());
        let data = decode::<SessionClaims>(token, &key, &self.validation()).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    tracing::debug!(error = %e, "Rejected session token");
                    AuthError::InvalidToken
                }
            }
        })?;
        let claims = data.claims;

        if !claims.aud.contains(&self.audience) {
            return Err(AuthError::InvalidToken);
        }

        let id = UserId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let email = claims.email.unwrap_or_default();

        Ok(AuthenticatedUser::new(id, email, claims.name, claims.premium))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-at-least-32-bytes-long!!";

    fn validator() -> JwtSessionValidator {
        JwtSessionValidator::new(
            SecretString::new(SECRET.to_string()),
            "https://auth.vrtour.test",
            "vr-tour-functions",
        )
    }

    fn token(secret: &str, exp_offset: i64, aud: Audience, premium: bool) -> String {
        let claims = SessionClaims {
            sub: "user-42".into(),
            iss: "https://auth.vrtour.test".into(),
            aud,
            exp: chrono::Utc::now().timestamp() + exp_offset,
            email: Some("traveller@example.com".into()),
            name: Some("Traveller".into()),
            premium,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn aud() -> Audience {
        Audience::Single("vr-tour-functions".into())
    }

    #[tokio::test]
    async fn valid_token_maps_claims() {
        let user = validator()
            .validate(&token(SECRET, 3600, aud(), true))
            .await
            .unwrap();

        assert_eq!(user.id.as_str(), "user-42");
        assert_eq!(user.email, "traveller@example.com");
        assert_eq!(user.display_name.as_deref(), Some("Traveller"));
        assert!(user.premium);
    }

    #[tokio::test]
    async fn audience_array_is_accepted() {
        let aud = Audience::Multiple(vec!["other".into(), "vr-tour-functions".into()]);
        assert!(validator().validate(&token(SECRET, 3600, aud, false)).await.is_ok());
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let result = validator()
            .validate(&token("another-secret-entirely-32-bytes!!", 3600, aud(), false))
            .await;
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn expired_token_is_expired() {
        let result = validator().validate(&token(SECRET, -3600, aud(), false)).await;
        assert_eq!(result, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn wrong_audience_is_invalid() {
        let result = validator()
            .validate(&token(SECRET, 3600, Audience::Single("admin-console".into()), false))
            .await;
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        assert_eq!(validator().validate("not-a-jwt").await, Err(AuthError::InvalidToken));
    }

    #[test]
    fn debug_hides_secret() {
        let rendered = format!("{:?}", validator());
        assert!(!rendered.contains(SECRET));
    }
}
