//! CreatePaymentIntentHandler - the `createPaymentIntent` backend function.
//!
//! Runs server side with the provider's secret key and hands the caller only
//! the intent id and client secret.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{AuthenticatedUser, TransactionId};
use crate::domain::payment::CurrencyCode;
use crate::ports::{CreateIntentRequest, IntentError, PaymentIntentService};

/// Caller-supplied payload, already unwrapped from the envelope.
#[derive(Debug, Clone)]
pub struct CreatePaymentIntentCommand {
    pub user: AuthenticatedUser,
    /// Amount in the currency's minor unit.
    pub amount_minor: i64,
    pub currency: String,
    pub transaction_id: String,
    pub description: Option<String>,
    pub receipt_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePaymentIntentResult {
    pub payment_intent_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreatePaymentIntentError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Provider(String),

    #[error("payment provider unavailable")]
    Unavailable,
}

impl CreatePaymentIntentError {
    /// Callable-function status code.
    pub fn status(&self) -> &'static str {
        match self {
            CreatePaymentIntentError::InvalidArgument(_) => "INVALID_ARGUMENT",
            CreatePaymentIntentError::Provider(_) => "FAILED_PRECONDITION",
            CreatePaymentIntentError::Unavailable => "UNAVAILABLE",
        }
    }
}

impl From<IntentError> for CreatePaymentIntentError {
    fn from(err: IntentError) -> Self {
        match err {
            IntentError::InvalidRequest(message) => CreatePaymentIntentError::InvalidArgument(message),
            IntentError::Provider { message, .. } => CreatePaymentIntentError::Provider(message),
            IntentError::Transport(_) => CreatePaymentIntentError::Unavailable,
        }
    }
}

pub struct CreatePaymentIntentHandler {
    intents: Arc<dyn PaymentIntentService>,
}

impl CreatePaymentIntentHandler {
    pub fn new(intents: Arc<dyn PaymentIntentService>) -> Self {
        Self { intents }
    }

    pub async fn handle(
        &self,
        cmd: CreatePaymentIntentCommand,
    ) -> Result<CreatePaymentIntentResult, CreatePaymentIntentError> {
        if cmd.amount_minor <= 0 {
            return Err(CreatePaymentIntentError::InvalidArgument(
                "amount must be a positive integer in the smallest currency unit".to_string(),
            ));
        }
        let currency = CurrencyCode::new(&cmd.currency)
            .map_err(|e| CreatePaymentIntentError::InvalidArgument(e.to_string()))?;
        let transaction_id: TransactionId = cmd.transaction_id.parse().map_err(|_| {
            CreatePaymentIntentError::InvalidArgument("transactionId is not a valid id".to_string())
        })?;

        let receipt_email = cmd
            .receipt_email
            .filter(|email| !email.trim().is_empty())
            .or_else(|| Some(cmd.user.email.clone()));

        let request = CreateIntentRequest {
            amount_minor: cmd.amount_minor,
            currency,
            transaction_id,
            user_id: cmd.user.id.clone(),
            receipt_email,
            description: cmd.description,
        };

        let intent = self.intents.create_intent(&request).await.map_err(|e| {
            tracing::error!(
                transaction_id = %transaction_id,
                user_id = %cmd.user.id,
                error = %e,
                "Payment intent creation failed"
            );
            CreatePaymentIntentError::from(e)
        })?;

        tracing::info!(
            transaction_id = %transaction_id,
            payment_intent_id = %intent.id,
            "Payment intent created"
        );

        Ok(CreatePaymentIntentResult {
            payment_intent_id: intent.id,
            client_secret: intent.client_secret,
        })
    }
}
