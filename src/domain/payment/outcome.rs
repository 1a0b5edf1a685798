//! Results of a gateway attempt, before and after normalization.

use serde::{Deserialize, Serialize};

use super::errors::GatewayError;
use super::PaymentMethod;

/// How strongly the gateway confirmed the payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confirmation {
    /// The provider reported the payment as captured (callback or intent status).
    Confirmed,
    /// A redirect form was submitted; the provider confirms out of band.
    Optimistic,
}

impl Confirmation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confirmation::Confirmed => "confirmed",
            Confirmation::Optimistic => "optimistic",
        }
    }
}

/// What a gateway adapter returns when the attempt went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayReceipt {
    pub provider_payment_id: Option<String>,
    pub confirmation: Confirmation,
}

impl GatewayReceipt {
    /// Receipt for a provider-confirmed payment.
    pub fn confirmed(provider_payment_id: impl Into<String>) -> Self {
        Self {
            provider_payment_id: Some(provider_payment_id.into()),
            confirmation: Confirmation::Confirmed,
        }
    }

    /// Receipt for a submitted redirect form.
    pub fn optimistic(provider_reference: Option<String>) -> Self {
        Self {
            provider_payment_id: provider_reference,
            confirmation: Confirmation::Optimistic,
        }
    }
}

/// Normalized outcome of `process`, the only thing the UI ever sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<Confirmation>,
    /// Payment went through but the entitlement or status write did not.
    #[serde(default)]
    pub reconciliation_required: bool,
}

impl PaymentOutcome {
    pub const RECONCILIATION_MESSAGE: &'static str =
        "Payment succeeded but account update failed. Please contact support.";

    pub fn succeeded(receipt: &GatewayReceipt) -> Self {
        Self {
            success: true,
            provider_payment_id: receipt.provider_payment_id.clone(),
            error: None,
            confirmation: Some(receipt.confirmation),
            reconciliation_required: false,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            provider_payment_id: None,
            error: Some(error.into()),
            confirmation: None,
            reconciliation_required: false,
        }
    }

    /// Failure outcome carrying the user-facing message for a gateway error.
    pub fn from_gateway_error(method: PaymentMethod, err: &GatewayError) -> Self {
        Self::failed(err.user_message(method))
    }

    /// Marks a successful outcome as needing manual reconciliation.
    pub fn needing_reconciliation(mut self) -> Self {
        self.reconciliation_required = true;
        self.error = Some(Self::RECONCILIATION_MESSAGE.to_string());
        self
    }
}
