//! Supported payment gateways.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A payment gateway the storefront can dispatch to.
///
/// The set is closed; every variant has exactly one adapter in the
/// gateway registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Popup overlay with completion callback.
    Razorpay,
    /// Hosted session plus redirect form.
    Cashfree,
    /// Signed form redirect.
    Paytm,
    /// Server-created intent confirmed client-side.
    Stripe,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Razorpay,
        PaymentMethod::Cashfree,
        PaymentMethod::Paytm,
        PaymentMethod::Stripe,
    ];

    /// Wire name used in stored documents and the gateway settings record.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Razorpay => "razorpay",
            PaymentMethod::Cashfree => "cashfree",
            PaymentMethod::Paytm => "paytm",
            PaymentMethod::Stripe => "stripe",
        }
    }

    /// Name shown to users in messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Razorpay => "Razorpay",
            PaymentMethod::Cashfree => "Cashfree",
            PaymentMethod::Paytm => "Paytm",
            PaymentMethod::Stripe => "Stripe",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported payment method '{}'", s))
    }
}
