//! HTTP handlers for backend function endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::adapters::http::middleware::OptionalAuth;
use crate::application::handlers::functions::{
    CreatePaymentIntentCommand, CreatePaymentIntentError, CreatePaymentIntentHandler,
};
use crate::ports::PaymentIntentService;

use super::dto::{
    CallableErrorResponse, CallableRequest, CallableResponse, CreatePaymentIntentRequest,
    CreatePaymentIntentResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct FunctionsAppState {
    pub payment_intents: Arc<dyn PaymentIntentService>,
}

impl FunctionsAppState {
    pub fn new(payment_intents: Arc<dyn PaymentIntentService>) -> Self {
        Self { payment_intents }
    }

    pub fn create_payment_intent_handler(&self) -> CreatePaymentIntentHandler {
        CreatePaymentIntentHandler::new(self.payment_intents.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /functions/createPaymentIntent
pub async fn create_payment_intent(
    State(state): State<FunctionsAppState>,
    OptionalAuth(user): OptionalAuth,
    body: Result<Json<CallableRequest<CreatePaymentIntentRequest>>, JsonRejection>,
) -> Result<impl IntoResponse, CallableError> {
    let user = user.ok_or_else(CallableError::unauthenticated)?;
    let Json(CallableRequest { data }) =
        body.map_err(|e| CallableError::invalid_argument(e.body_text()))?;

    let command = CreatePaymentIntentCommand {
        user,
        amount_minor: data.amount,
        currency: data.currency,
        transaction_id: data.transaction_id,
        description: data.description,
        receipt_email: data.receipt_email,
    };

    let result = state.create_payment_intent_handler().handle(command).await?;

    Ok(Json(CallableResponse::new(CreatePaymentIntentResponse::from(
        result,
    ))))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// Error rendered in the callable envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableError {
    pub http_status: StatusCode,
    pub status: &'static str,
    pub message: String,
}

impl CallableError {
    pub fn unauthenticated() -> Self {
        Self {
            http_status: StatusCode::UNAUTHORIZED,
            status: "UNAUTHENTICATED",
            message: "Authentication required".to_string(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            http_status: StatusCode::BAD_REQUEST,
            status: "INVALID_ARGUMENT",
            message: message.into(),
        }
    }
}

impl From<CreatePaymentIntentError> for CallableError {
    fn from(err: CreatePaymentIntentError) -> Self {
        let http_status = match err {
            CreatePaymentIntentError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CreatePaymentIntentError::Provider(_) => StatusCode::BAD_REQUEST,
            CreatePaymentIntentError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self {
            http_status,
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for CallableError {
    fn into_response(self) -> Response {
        let body = CallableErrorResponse::new(self.status, self.message);
        (self.http_status, Json(body)).into_response()
    }
}
