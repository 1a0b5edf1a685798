//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Bearer token validation (HS256 JWT)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HMAC secret
    pub jwt_secret: SecretString,

    /// Expected `iss` claim
    pub jwt_issuer: String,

    /// Expected `aud` claim
    #[serde(default = "default_audience")]
    pub jwt_audience: String,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// In production the secret must be at least 32 bytes.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if self.jwt_issuer.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_ISSUER"));
        }
        if self.jwt_audience.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_AUDIENCE"));
        }
        if *environment == Environment::Production && secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(ValidationError::JwtSecretTooShort);
        }
        Ok(())
    }
}

fn default_audience() -> String {
    "vr-tour-functions".to_string()
}
