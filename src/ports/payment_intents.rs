//! Payment intent service port.
//!
//! Server side of `createPaymentIntent`: talks to the provider with the
//! secret key and hands back only what the client needs to confirm.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{TransactionId, UserId};
use crate::domain::payment::CurrencyCode;

/// Request to create an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIntentRequest {
    /// Amount in the currency's minor unit.
    pub amount_minor: i64,
    pub currency: CurrencyCode,
    /// Our transaction id; also used as the idempotency key.
    pub transaction_id: TransactionId,
    pub user_id: UserId,
    pub receipt_email: Option<String>,
    pub description: Option<String>,
}

/// A created intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("invalid intent request: {0}")]
    InvalidRequest(String),

    #[error("provider error: {message}")]
    Provider {
        code: Option<String>,
        message: String,
    },

    #[error("provider unreachable: {0}")]
    Transport(String),
}

#[async_trait]
pub trait PaymentIntentService: Send + Sync {
    async fn create_intent(
        &self,
        request: &CreateIntentRequest,
    ) -> Result<PaymentIntent, IntentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_intent_service_is_object_safe() {
        fn _accepts_dyn(_service: &dyn PaymentIntentService) {}
    }
}
