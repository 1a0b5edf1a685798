//! Stripe PaymentIntents adapter.
//!
//! Server side of `createPaymentIntent`. Creates the intent with the secret
//! key and returns the client secret the browser confirms with.
//!
//! # Security
//!
//! - The secret key is held as `secrecy::SecretString` and never logged
//! - The transaction id is sent as `Idempotency-Key`, so a retried call for
//!   the same transaction returns the same intent instead of a second charge

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::ports::{CreateIntentRequest, IntentError, PaymentIntent, PaymentIntentService};

pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for the Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: STRIPE_API_BASE.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_test_mode(&self) -> bool {
        self.api_key.expose_secret().starts_with("sk_test_")
    }
}

#[derive(Debug, Deserialize)]
struct StripeIntent {
    id: String,
    client_secret: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct StripePaymentIntentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentIntentAdapter {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn intents_url(&self) -> String {
        format!("{}/v1/payment_intents", self.config.api_base_url)
    }
}

/// Form parameters for `POST /v1/payment_intents`.
fn intent_params(request: &CreateIntentRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("amount", request.amount_minor.to_string()),
        ("currency", request.currency.as_str().to_ascii_lowercase()),
        ("automatic_payment_methods[enabled]", "true".to_string()),
        ("metadata[transaction_id]", request.transaction_id.to_string()),
        ("metadata[user_id]", request.user_id.to_string()),
    ];
    if let Some(email) = &request.receipt_email {
        params.push(("receipt_email", email.clone()));
    }
    if let Some(description) = &request.description {
        params.push(("description", description.clone()));
    }
    params
}

fn provider_error(body: &str) -> IntentError {
    match serde_json::from_str::<StripeErrorEnvelope>(body) {
        Ok(envelope) => IntentError::Provider {
            code: envelope.error.code,
            message: envelope
                .error
                .message
                .unwrap_or_else(|| "Stripe rejected the request".to_string()),
        },
        Err(_) => IntentError::Provider {
            code: None,
            message: format!("Stripe API error: {}", body),
        },
    }
}

#[async_trait]
impl PaymentIntentService for StripePaymentIntentAdapter {
    async fn create_intent(
        &self,
        request: &CreateIntentRequest,
    ) -> Result<PaymentIntent, IntentError> {
        if request.amount_minor <= 0 {
            return Err(IntentError::InvalidRequest(
                "amount must be positive".to_string(),
            ));
        }

        let response = self
            .http_client
            .post(self.intents_url())
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .header("Idempotency-Key", request.transaction_id.to_string())
            .form(&intent_params(request))
            .send()
            .await
            .map_err(|e| IntentError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let err = provider_error(&error_text);
            tracing::error!(
                transaction_id = %request.transaction_id,
                error = %err,
                "Stripe create_payment_intent failed"
            );
            return Err(err);
        }

        let intent: StripeIntent = response.json().await.map_err(|e| IntentError::Provider {
            code: None,
            message: format!("Failed to parse Stripe response: {}", e),
        })?;

        tracing::info!(
            transaction_id = %request.transaction_id,
            payment_intent_id = %intent.id,
            "Payment intent created"
        );

        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            status: intent.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{TransactionId, UserId};
    use crate::domain::payment::CurrencyCode;

    fn request() -> CreateIntentRequest {
        CreateIntentRequest {
            amount_minor: 1250,
            currency: CurrencyCode::new("USD").unwrap(),
            transaction_id: TransactionId::new(),
            user_id: UserId::new("user-42").unwrap(),
            receipt_email: Some("a@b.io".into()),
            description: None,
        }
    }

    #[test]
    fn config_defaults_to_live_api() {
        let config = StripeConfig::new(SecretString::new("sk_test_abc".into()));
        assert_eq!(config.api_base_url, "https://api.stripe.com");
        assert!(config.is_test_mode());
    }

    #[test]
    fn config_with_base_url_trims_slash() {
        let adapter = StripePaymentIntentAdapter::new(
            StripeConfig::new(SecretString::new("sk_live_abc".into()))
                .with_base_url("http://localhost:12111/"),
        );
        assert_eq!(adapter.intents_url(), "http://localhost:12111/v1/payment_intents");
    }

    #[test]
    fn params_carry_lowercase_currency_and_metadata() {
        let req = request();
        let params = intent_params(&req);

        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
        };
        assert_eq!(get("amount").as_deref(), Some("1250"));
        assert_eq!(get("currency").as_deref(), Some("usd"));
        assert_eq!(get("metadata[transaction_id]"), Some(req.transaction_id.to_string()));
        assert_eq!(get("receipt_email").as_deref(), Some("a@b.io"));
        assert_eq!(get("description"), None);
    }

    #[test]
    fn provider_error_reads_stripe_envelope() {
        let err = provider_error(
            r#"{"error":{"code":"amount_too_small","message":"Amount must be at least $0.50 usd","type":"invalid_request_error"}}"#,
        );
        assert_eq!(
            err,
            IntentError::Provider {
                code: Some("amount_too_small".into()),
                message: "Amount must be at least $0.50 usd".into(),
            }
        );
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected_locally() {
        let adapter = StripePaymentIntentAdapter::new(StripeConfig::new(SecretString::new(
            "sk_test_abc".into(),
        )));
        let mut req = request();
        req.amount_minor = 0;

        assert!(matches!(
            adapter.create_intent(&req).await,
            Err(IntentError::InvalidRequest(_))
        ));
    }
}
