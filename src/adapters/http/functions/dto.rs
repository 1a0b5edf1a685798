//! Callable-function envelope and payloads.
//!
//! Requests arrive as `{"data": payload}`. Success responses are
//! `{"result": value}`, failures are `{"error": {"status", "message"}}`
//! where `status` is a canonical code such as `INVALID_ARGUMENT`.

use serde::{Deserialize, Serialize};

use crate::application::handlers::functions::CreatePaymentIntentResult;

// ════════════════════════════════════════════════════════════════════════════════
// Envelope
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CallableRequest<T> {
    pub data: T,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallableResponse<T> {
    pub result: T,
}

impl<T> CallableResponse<T> {
    pub fn new(result: T) -> Self {
        Self { result }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableErrorBody {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableErrorResponse {
    pub error: CallableErrorBody,
}

impl CallableErrorResponse {
    pub fn new(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: CallableErrorBody {
                status: status.into(),
                message: message.into(),
            },
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// createPaymentIntent
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    /// Minor units.
    pub amount: i64,
    pub currency: String,
    pub transaction_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub receipt_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    pub client_secret: String,
    pub payment_intent_id: String,
}

impl From<CreatePaymentIntentResult> for CreatePaymentIntentResponse {
    fn from(result: CreatePaymentIntentResult) -> Self {
        Self {
            client_secret: result.client_secret,
            payment_intent_id: result.payment_intent_id,
        }
    }
}
