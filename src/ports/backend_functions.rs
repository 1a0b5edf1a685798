//! Trusted backend function port.
//!
//! A single RPC into server code that holds secrets the client must not have.
//! Payloads follow the callable-function envelope: the request body is
//! `{"data": payload}` and a successful response is `{"result": value}`.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Name of the function that creates a Stripe payment intent.
pub const CREATE_PAYMENT_INTENT: &str = "createPaymentIntent";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    #[error("caller is not authenticated")]
    Unauthenticated,

    #[error("function rejected the call ({status}): {message}")]
    Rejected { status: String, message: String },

    #[error("function call failed: {0}")]
    Transport(String),

    #[error("function returned an unexpected response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait BackendFunctions: Send + Sync {
    /// Invokes `name` with `payload` and returns the unwrapped result.
    async fn call(&self, name: &str, payload: Value) -> Result<Value, FunctionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_functions_is_object_safe() {
        fn _accepts_dyn(_functions: &dyn BackendFunctions) {}
    }

    #[test]
    fn rejected_displays_status_and_message() {
        let err = FunctionError::Rejected {
            status: "INVALID_ARGUMENT".to_string(),
            message: "amount must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "function rejected the call (INVALID_ARGUMENT): amount must be positive"
        );
    }
}
