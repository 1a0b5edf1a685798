//! Value-object validation failures and stable error codes.

use std::fmt;
use thiserror::Error;

/// Rejected input while building a value object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be positive, got {actual}")]
    NotPositive { field: String, actual: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn not_positive(field: impl Into<String>, actual: impl fmt::Display) -> Self {
        ValidationError::NotPositive {
            field: field.into(),
            actual: actual.to_string(),
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::NotPositive { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Machine-readable category attached to logs and error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationFailed,
    TransactionNotFound,
    InvalidStateTransition,
    Forbidden,
    StoreError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::TransactionNotFound => "TRANSACTION_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::StoreError => "STORE_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        assert_eq!(
            ValidationError::empty_field("payer_email").to_string(),
            "Field 'payer_email' cannot be empty"
        );
        assert_eq!(
            ValidationError::not_positive("amount", "-5.00").to_string(),
            "Field 'amount' must be positive, got -5.00"
        );
        assert_eq!(
            ValidationError::invalid_format("currency", "expected 3 letters").to_string(),
            "Field 'currency' has invalid format: expected 3 letters"
        );
    }

    #[test]
    fn field_is_exposed_for_every_variant() {
        assert_eq!(ValidationError::empty_field("a").field(), "a");
        assert_eq!(ValidationError::not_positive("b", 0).field(), "b");
        assert_eq!(ValidationError::invalid_format("c", "x").field(), "c");
    }

    #[test]
    fn codes_render_screaming_snake_case() {
        assert_eq!(ErrorCode::StoreError.to_string(), "STORE_ERROR");
        assert_eq!(
            ErrorCode::InvalidStateTransition.to_string(),
            "INVALID_STATE_TRANSITION"
        );
    }
}
