//! Admin-managed gateway settings.
//!
//! Stored as a single record (`settings/paymentGateways`) with one optional
//! block per provider. Read fresh before every attempt.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::errors::GatewayError;
use super::PaymentMethod;

/// Credential pair and switch for one provider.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayCredentials {
    /// Public or identifier key: Razorpay key id, Cashfree app id, Paytm MID,
    /// Stripe publishable key.
    #[serde(default, alias = "keyId", alias = "appId", alias = "merchantId", alias = "publishableKey")]
    pub public_key: Option<String>,

    /// Secret key: Razorpay key secret, Cashfree secret, Paytm merchant key,
    /// Stripe secret key.
    #[serde(default, alias = "keySecret", alias = "merchantKey")]
    pub secret_key: Option<SecretString>,

    #[serde(default)]
    pub is_active: bool,
}

impl GatewayCredentials {
    pub fn new(public_key: impl Into<String>, secret_key: impl Into<String>, is_active: bool) -> Self {
        Self {
            public_key: Some(public_key.into()),
            secret_key: Some(SecretString::new(secret_key.into())),
            is_active,
        }
    }

    /// The public key, or `MissingCredential` when absent or blank.
    pub fn require_public_key(&self) -> Result<&str, GatewayError> {
        self.public_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(GatewayError::MissingCredential { key: "publicKey" })
    }

    /// The secret key, or `MissingCredential` when absent or blank.
    pub fn require_secret_key(&self) -> Result<&str, GatewayError> {
        self.secret_key
            .as_ref()
            .map(|secret| secret.expose_secret().as_str())
            .filter(|key| !key.trim().is_empty())
            .ok_or(GatewayError::MissingCredential { key: "secretKey" })
    }
}

/// The whole gateway settings record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub razorpay: Option<GatewayCredentials>,
    #[serde(default)]
    pub cashfree: Option<GatewayCredentials>,
    #[serde(default)]
    pub paytm: Option<GatewayCredentials>,
    #[serde(default)]
    pub stripe: Option<GatewayCredentials>,
}

impl GatewayConfig {
    pub fn credentials_for(&self, method: PaymentMethod) -> Option<&GatewayCredentials> {
        match method {
            PaymentMethod::Razorpay => self.razorpay.as_ref(),
            PaymentMethod::Cashfree => self.cashfree.as_ref(),
            PaymentMethod::Paytm => self.paytm.as_ref(),
            PaymentMethod::Stripe => self.stripe.as_ref(),
        }
    }

    /// Credentials for `method` if its block exists and is switched on.
    pub fn active_credentials(
        &self,
        method: PaymentMethod,
    ) -> Result<&GatewayCredentials, GatewayError> {
        self.credentials_for(method)
            .filter(|creds| creds.is_active)
            .ok_or(GatewayError::NotConfigured)
    }

    /// Builder used when assembling a record in code.
    pub fn with(mut self, method: PaymentMethod, credentials: GatewayCredentials) -> Self {
        let slot = match method {
            PaymentMethod::Razorpay => &mut self.razorpay,
            PaymentMethod::Cashfree => &mut self.cashfree,
            PaymentMethod::Paytm => &mut self.paytm,
            PaymentMethod::Stripe => &mut self.stripe,
        };
        *slot = Some(credentials);
        self
    }
}
