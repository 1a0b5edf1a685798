//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Server-side Stripe settings for `createPaymentIntent`
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_secret_key: SecretString,

    /// Stripe API base override
    pub stripe_api_base: Option<String>,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_secret_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_secret_key.expose_secret().starts_with("sk_live_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.stripe_secret_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__STRIPE_SECRET_KEY"));
        }
        // Publishable keys must never be configured here
        if !key.starts_with("sk_") && !key.starts_with("rk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if let Some(base) = &self.stripe_api_base {
            if !is_http_url(base) {
                return Err(ValidationError::InvalidUrl("PAYMENT__STRIPE_API_BASE"));
            }
        }
        Ok(())
    }
}

pub(super) fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}
