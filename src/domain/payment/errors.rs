//! Payment-specific error types.
//!
//! `GatewayError` is what a gateway adapter returns; the coordinator turns it
//! into a user-facing string and never lets it escape. `PaymentError` covers
//! the store-backed commands (create, grant, refund, queries).
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | InvalidState | 409 |
//! | ValidationFailed | 400 |
//! | Forbidden | 403 |
//! | Infrastructure | 500 |

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, TransactionId, ValidationError};

use super::signature::SignatureError;
use super::PaymentMethod;

/// Message shown for any failure whose detail is only meant for operators.
pub const GENERIC_PAYMENT_FAILURE: &str = "Payment failed. Please try again.";

/// Why a single gateway attempt did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Config block absent or `isActive` false.
    #[error("gateway is not configured or enabled")]
    NotConfigured,

    /// Config block is active but lacks a key the integration needs.
    #[error("gateway credential '{key}' is missing")]
    MissingCredential { key: &'static str },

    /// Request signing failed.
    #[error("request signing failed: {0}")]
    Signing(#[from] SignatureError),

    /// The provider rejected the payment.
    #[error("provider declined the payment: {}", reason.as_deref().unwrap_or("no reason given"))]
    ProviderDeclined { reason: Option<String> },

    /// The payer closed the checkout without paying.
    #[error("payment cancelled by payer")]
    Cancelled,

    /// Network or provider API failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Anything else, including a panicking adapter.
    #[error("unexpected gateway error: {0}")]
    Unexpected(String),
}

impl GatewayError {
    pub fn declined(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        GatewayError::ProviderDeclined {
            reason: if reason.trim().is_empty() {
                None
            } else {
                Some(reason)
            },
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        GatewayError::Transport(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        GatewayError::Unexpected(message.into())
    }

    /// Message safe to show the payer.
    pub fn user_message(&self, method: PaymentMethod) -> String {
        match self {
            GatewayError::NotConfigured => {
                format!("{} is not configured or enabled", method.display_name())
            }
            GatewayError::MissingCredential { key } => {
                format!("{} is not configured: missing {}", method.display_name(), key)
            }
            GatewayError::ProviderDeclined { reason: Some(reason) } => reason.clone(),
            GatewayError::Cancelled => "Payment cancelled".to_string(),
            GatewayError::Signing(_)
            | GatewayError::ProviderDeclined { reason: None }
            | GatewayError::Transport(_)
            | GatewayError::Unexpected(_) => GENERIC_PAYMENT_FAILURE.to_string(),
        }
    }

    /// Configuration problems are the admin's to fix, not the payer's.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GatewayError::NotConfigured | GatewayError::MissingCredential { .. }
        )
    }
}

/// Errors from transaction and entitlement commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    /// Transaction was not found.
    NotFound(TransactionId),

    /// Operation not allowed in the transaction's current status.
    InvalidState { current: String, attempted: String },

    /// Input validation failed.
    ValidationFailed { field: String, message: String },

    /// Caller may not act on this transaction.
    Forbidden(String),

    /// Store or other infrastructure failure.
    Infrastructure(String),
}

impl PaymentError {
    pub fn not_found(id: TransactionId) -> Self {
        PaymentError::NotFound(id)
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        PaymentError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        PaymentError::Forbidden(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PaymentError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PaymentError::NotFound(_) => ErrorCode::TransactionNotFound,
            PaymentError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            PaymentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            PaymentError::Forbidden(_) => ErrorCode::Forbidden,
            PaymentError::Infrastructure(_) => ErrorCode::StoreError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            PaymentError::NotFound(id) => format!("Transaction not found: {}", id),
            PaymentError::InvalidState { current, attempted } => {
                format!("Cannot {} transaction in {} state", attempted, current)
            }
            PaymentError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            PaymentError::Forbidden(msg) => msg.clone(),
            PaymentError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PaymentError {}

impl From<ValidationError> for PaymentError {
    fn from(err: ValidationError) -> Self {
        PaymentError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}
