//! Stripe hosted intent.
//!
//! The intent is created by the `createPaymentIntent` backend function (it
//! needs the secret key), then confirmed client-side with Stripe.js and the
//! publishable key from the gateway settings.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::domain::payment::{GatewayConfig, GatewayError, GatewayReceipt, PaymentMethod};
use crate::ports::{
    BackendFunctions, CheckoutHost, FunctionError, GatewayRequest, IntentConfirmation,
    PaymentGatewayAdapter, CREATE_PAYMENT_INTENT,
};

pub const STRIPE_JS_URL: &str = "https://js.stripe.com/v3/";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedIntent {
    client_secret: String,
}

impl From<FunctionError> for GatewayError {
    fn from(err: FunctionError) -> Self {
        match err {
            FunctionError::Rejected { message, .. } => GatewayError::declined(message),
            FunctionError::Transport(message) => GatewayError::transport(message),
            other @ (FunctionError::Unauthenticated | FunctionError::InvalidResponse(_)) => {
                GatewayError::unexpected(other.to_string())
            }
        }
    }
}

pub struct StripeGateway {
    host: Arc<dyn CheckoutHost>,
    functions: Arc<dyn BackendFunctions>,
}

impl StripeGateway {
    pub fn new(host: Arc<dyn CheckoutHost>, functions: Arc<dyn BackendFunctions>) -> Self {
        Self { host, functions }
    }
}

#[async_trait]
impl PaymentGatewayAdapter for StripeGateway {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Stripe
    }

    async fn attempt(
        &self,
        request: &GatewayRequest,
        config: &GatewayConfig,
    ) -> Result<GatewayReceipt, GatewayError> {
        let credentials = config.active_credentials(PaymentMethod::Stripe)?;
        let publishable_key = credentials.require_public_key()?;
        let amount_minor = request
            .money
            .to_minor_units()
            .map_err(|e| GatewayError::unexpected(e.to_string()))?;

        let result = self
            .functions
            .call(
                CREATE_PAYMENT_INTENT,
                json!({
                    "amount": amount_minor,
                    "currency": request.money.currency().as_str().to_ascii_lowercase(),
                    "transactionId": request.transaction_id.to_string(),
                    "description": request.description,
                    "receiptEmail": request.payer.email,
                }),
            )
            .await?;
        let intent: CreatedIntent = serde_json::from_value(result).map_err(|e| {
            GatewayError::unexpected(format!("createPaymentIntent returned no client secret: {}", e))
        })?;

        self.host.load_script(STRIPE_JS_URL).await?;

        match self
            .host
            .confirm_card_payment(publishable_key, &intent.client_secret)
            .await?
        {
            IntentConfirmation::Succeeded { payment_intent_id } => {
                Ok(GatewayReceipt::confirmed(payment_intent_id))
            }
            IntentConfirmation::Failed { message } => {
                Err(GatewayError::declined(message.unwrap_or_default()))
            }
        }
    }
}
